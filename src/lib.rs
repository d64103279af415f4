//! Parser and canonical serializer for MDX queries.
//!
//! ```
//! let query = fluent_mdx::parse_query(
//!     "SELECT NON EMPTY { [Measures].[Sales] } ON COLUMNS FROM [Cube] WHERE [Date].[Year].&[2014]",
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     query.to_string(),
//!     "SELECT NON EMPTY { [Measures].[Sales] } ON COLUMNS FROM [Cube] WHERE { ( { [Date].[Year].&[2014] } ) }"
//! );
//! ```
pub mod ast;
pub mod cli;
pub mod cursor;
pub mod lexer;
pub mod parser;

pub use ast::{Query, Token, TokenKind};
pub use cursor::{BacktrackingCursor, CursorError};
pub use lexer::{LexError, Lexer, RuleTable, tokenize};
pub use parser::{ParseError, ParseOptions, Parser};

/// Parses a complete MDX query with default options.
pub fn parse_query(source: &str) -> Result<Query, ParseError> {
    parse_query_with(source, ParseOptions::default())
}

pub fn parse_query_with(source: &str, options: ParseOptions) -> Result<Query, ParseError> {
    Parser::with_options(source, options)?.parse_query()
}
