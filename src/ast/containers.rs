use std::fmt;

use crate::ast::{Function, Member, Range, write_joined};

/// Anything that can sit directly inside a [`Tuple`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TupleChild {
    Member(Member),
    Range(Range),
    Function(Function),
    Set(Set),
}

/// Anything that can sit directly inside a [`Set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetChild {
    Member(Member),
    Range(Range),
    Function(Function),
    Tuple(Tuple),
}

/// A child that is not a container, shared by both container kinds.
enum Flat {
    Member(Member),
    Range(Range),
    Function(Function),
}

impl Flat {
    fn into_tuple_child(self) -> TupleChild {
        match self {
            Flat::Member(m) => TupleChild::Member(m),
            Flat::Range(r) => TupleChild::Range(r),
            Flat::Function(func) => TupleChild::Function(func),
        }
    }

    fn into_set_child(self) -> SetChild {
        match self {
            Flat::Member(m) => SetChild::Member(m),
            Flat::Range(r) => SetChild::Range(r),
            Flat::Function(func) => SetChild::Function(func),
        }
    }
}

impl TupleChild {
    fn split(self) -> Result<Flat, Set> {
        match self {
            TupleChild::Member(m) => Ok(Flat::Member(m)),
            TupleChild::Range(r) => Ok(Flat::Range(r)),
            TupleChild::Function(func) => Ok(Flat::Function(func)),
            TupleChild::Set(set) => Err(set),
        }
    }
}

impl SetChild {
    fn split(self) -> Result<Flat, Tuple> {
        match self {
            SetChild::Member(m) => Ok(Flat::Member(m)),
            SetChild::Range(r) => Ok(Flat::Range(r)),
            SetChild::Function(func) => Ok(Flat::Function(func)),
            SetChild::Tuple(tuple) => Err(tuple),
        }
    }
}

macro_rules! child_from {
    ($child:ident: $($variant:ident),+) => {
        $(
            impl From<$variant> for $child {
                fn from(value: $variant) -> Self {
                    $child::$variant(value)
                }
            }
        )+
    };
}

child_from!(TupleChild: Member, Range, Function, Set);
child_from!(SetChild: Member, Range, Function, Tuple);

/// Curly-bracketed container: `{ a, b }`.
///
/// Holds flat children or nested [`Set`]s, never both. See
/// [`Tuple::with`] for how appending keeps that true.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tuple {
    children: Vec<TupleChild>,
}

impl Tuple {
    pub fn new() -> Self {
        Tuple::default()
    }

    /// Appends a child.
    ///
    /// The first [`Set`] added to a tuple that already has flat children
    /// folds those children, in order, into a new set placed before it.
    /// Once the tuple holds sets, flat children are added to the last set.
    pub fn with(mut self, child: impl Into<TupleChild>) -> Self {
        match child.into().split() {
            Ok(flat) => self.push_flat(flat),
            Err(set) => self.push_set(set),
        }
        self
    }

    /// Appends every child of `other`, one by one.
    pub fn merge(self, other: Tuple) -> Self {
        other.children.into_iter().fold(self, Tuple::with)
    }

    pub fn children(&self) -> &[TupleChild] {
        &self.children
    }

    pub fn into_children(self) -> Vec<TupleChild> {
        self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// True when the children are sets rather than flat items.
    pub fn is_nested(&self) -> bool {
        matches!(self.children.last(), Some(TupleChild::Set(_)))
    }

    fn push_flat(&mut self, flat: Flat) {
        match self.children.last_mut() {
            Some(TupleChild::Set(last)) => {
                let set = std::mem::take(last);
                *last = set.with(flat.into_set_child());
            }
            _ => self.children.push(flat.into_tuple_child()),
        }
    }

    fn push_set(&mut self, set: Set) {
        if !self.children.is_empty() && !self.is_nested() {
            let folded = std::mem::take(&mut self.children)
                .into_iter()
                .fold(Set::new(), |acc, child| match child.split() {
                    Ok(flat) => acc.with(flat.into_set_child()),
                    Err(inner) => acc.merge(inner),
                });
            self.children.push(TupleChild::Set(folded));
        }
        self.children.push(TupleChild::Set(set));
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        write_joined(f, &self.children, ", ")?;
        f.write_str(" }")
    }
}

/// Round-bracketed container: `( a, b )`.
///
/// Mirror image of [`Tuple`]: flat children or nested tuples, never both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Set {
    children: Vec<SetChild>,
}

impl Set {
    pub fn new() -> Self {
        Set::default()
    }

    /// Appends a child, folding flat children into a tuple the same way
    /// [`Tuple::with`] folds them into a set.
    pub fn with(mut self, child: impl Into<SetChild>) -> Self {
        match child.into().split() {
            Ok(flat) => self.push_flat(flat),
            Err(tuple) => self.push_tuple(tuple),
        }
        self
    }

    /// Appends every child of `other`, one by one.
    pub fn merge(self, other: Set) -> Self {
        other.children.into_iter().fold(self, Set::with)
    }

    pub fn children(&self) -> &[SetChild] {
        &self.children
    }

    pub fn into_children(self) -> Vec<SetChild> {
        self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// True when the children are tuples rather than flat items.
    pub fn is_nested(&self) -> bool {
        matches!(self.children.last(), Some(SetChild::Tuple(_)))
    }

    fn push_flat(&mut self, flat: Flat) {
        match self.children.last_mut() {
            Some(SetChild::Tuple(last)) => {
                let tuple = std::mem::take(last);
                *last = tuple.with(flat.into_tuple_child());
            }
            _ => self.children.push(flat.into_set_child()),
        }
    }

    fn push_tuple(&mut self, tuple: Tuple) {
        if !self.children.is_empty() && !self.is_nested() {
            let folded = std::mem::take(&mut self.children)
                .into_iter()
                .fold(Tuple::new(), |acc, child| match child.split() {
                    Ok(flat) => acc.with(flat.into_tuple_child()),
                    Err(inner) => acc.merge(inner),
                });
            self.children.push(SetChild::Tuple(folded));
        }
        self.children.push(SetChild::Tuple(tuple));
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("( ")?;
        write_joined(f, &self.children, ", ")?;
        f.write_str(" )")
    }
}

impl fmt::Display for TupleChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TupleChild::Member(m) => write!(f, "{m}"),
            TupleChild::Range(r) => write!(f, "{r}"),
            TupleChild::Function(func) => write!(f, "{func}"),
            TupleChild::Set(set) => write!(f, "{set}"),
        }
    }
}

impl fmt::Display for SetChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetChild::Member(m) => write!(f, "{m}"),
            SetChild::Range(r) => write!(f, "{r}"),
            SetChild::Function(func) => write!(f, "{func}"),
            SetChild::Tuple(tuple) => write!(f, "{tuple}"),
        }
    }
}
