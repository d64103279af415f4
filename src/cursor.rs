//! Two-way cursor over a lazily consumed sequence, with a stack of saved
//! positions for backtracking.
//!
//! Elements are pulled from the source iterator on demand and buffered, so
//! stepping back never re-runs the source. Saved positions are absolute
//! buffer indices, which makes restoring a position a plain seek.
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("Cannot move before the first element")]
    BeforeStart,
}

/// Bidirectional cursor with save/restore.
///
/// Position `0` is "before the first element". After `n` successful calls to
/// [`move_next`](Self::move_next) the current element is the `n`-th one.
pub struct BacktrackingCursor<I: Iterator> {
    source: I,
    buffer: Vec<I::Item>,
    cursor: usize,
    saved: Vec<usize>,
}

impl<I: Iterator> BacktrackingCursor<I> {
    pub fn new(source: impl IntoIterator<IntoIter = I>) -> Self {
        BacktrackingCursor {
            source: source.into_iter(),
            buffer: Vec::new(),
            cursor: 0,
            saved: Vec::new(),
        }
    }

    /// Advances one element. Returns `false`, without moving, when the
    /// source is exhausted.
    pub fn move_next(&mut self) -> bool {
        if self.cursor == self.buffer.len() {
            match self.source.next() {
                Some(item) => self.buffer.push(item),
                None => return false,
            }
        }
        self.cursor += 1;
        true
    }

    /// Steps back one element.
    pub fn move_previous(&mut self) -> Result<(), CursorError> {
        if self.cursor == 0 {
            return Err(CursorError::BeforeStart);
        }
        self.cursor -= 1;
        Ok(())
    }

    /// The element under the cursor, `None` before the first move.
    pub fn current(&self) -> Option<&I::Item> {
        self.cursor.checked_sub(1).and_then(|i| self.buffer.get(i))
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn save_position(&mut self) {
        self.saved.push(self.cursor);
    }

    /// Pops the most recent saved position and moves back to it.
    /// Does nothing when no position is saved.
    pub fn restore_last_saved_position(&mut self) {
        if let Some(position) = self.saved.pop() {
            self.cursor = position;
        }
    }

    /// Pops the most recent saved position without moving.
    /// Does nothing when no position is saved.
    pub fn remove_last_saved_state(&mut self) {
        self.saved.pop();
    }

    /// Number of positions currently saved.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
