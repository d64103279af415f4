use std::fmt;

/// Kind of a lexical token.
///
/// The set is closed: the lexer's rule table maps every pattern onto one of
/// these kinds, and the parser only ever compares kinds, never raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Raw end-of-line characters. Matched by the lexer but never yielded.
    EndOfLine,

    // Keywords
    /// `SELECT`
    Select,
    /// `FROM`
    From,
    /// `WHERE`
    Where,
    /// `ON`
    On,
    /// `NON`
    Non,
    /// `EMPTY`
    Empty,
    /// `WITH`
    With,
    /// `MEMBER`
    Member,
    /// `SET`
    Set,
    /// `AS`
    As,
    /// `DIMENSION`
    Dimension,
    /// `PROPERTIES`
    Properties,

    /// Axis name
    ///
    /// # Examples
    /// ```text
    /// COLUMNS
    /// ROWS
    /// AXIS(3)
    /// ```
    AxisName,

    /// Intrinsic dimension property
    ///
    /// # Examples
    /// ```text
    /// MEMBER_CAPTION
    /// CHILDREN_CARDINALITY
    /// KEY0
    /// ```
    DimensionProperty,

    // Delimiters
    /// `{`
    LeftCurlyBracket,
    /// `}`
    RightCurlyBracket,
    /// `(`
    LeftRoundBracket,
    /// `)`
    RightRoundBracket,
    /// `[`
    LeftSquareBracket,
    /// `]`
    RightSquareBracket,
    /// `,` between members, axes, cubes and parameters
    Comma,
    /// `:` between the two ends of a range
    Colon,
    /// `.&` in front of a member key
    ValueSeparator,
    /// `.` between identifier parts
    Dot,

    // Literals
    /// Timestamp literal
    ///
    /// # Example
    /// ```text
    /// 2014-01-31T00:00:00
    /// ```
    Date,
    /// Integer or decimal literal
    Number,
    /// `TRUE` or `FALSE`
    Logical,
    /// Bare identifier, bracketed name or quoted literal
    ///
    /// # Examples
    /// ```text
    /// CROSSJOIN
    /// Dim Hierarchy      (inside `[` `]`)
    /// "some value"
    /// ```
    Identifier,

    // Operators
    /// `NOT`
    Not,
    /// `AND`, `OR`, `XOR`
    LogicOperator,
    /// Arithmetic and comparison operators
    ///
    /// # Examples
    /// ```text
    /// + - * / < <= = <> >= >
    /// ```
    MathOperator,
    /// `ASC`, `DESC`, `BASC`, `BDESC`
    Ordering,

    /// End of input sentinel
    End,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A recognized chunk of source text.
///
/// Tokens are produced by the lexer only and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    /// The end-of-input sentinel.
    pub fn end() -> Self {
        Token::new(TokenKind::End, "")
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }
}

/// Renders as `Kind[text]`, the format used in parse diagnostics.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.text)
    }
}
