//! # MDX Expression Tree
//!
//! This module defines the strongly-typed tree that MDX query text is parsed
//! into, and the canonical serializer that turns it back into text.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[members]** - Members, member ranges and navigation functions
//! - **[containers]** - Tuples (`{ }`) and sets (`( )`)
//! - **[expressions]** - Expressions, constants and function calls
//! - **[query]** - Queries, axes, cubes and `WITH` declarations
//!
//! ## Quick Start
//!
//! ```text
//! SELECT NON EMPTY { [Measures].[Sales] } ON COLUMNS FROM [Cube]
//! ```
//!
//! parses into a [`Query`] with one [`Axis`] (titled `COLUMNS`, non-empty,
//! sliced by a one-member [`Tuple`]) and one [`Cube`].
//!
//! ## Core Concepts
//!
//! ### Canonical text
//!
//! Every node implements [`std::fmt::Display`]; that implementation *is* the
//! serializer. It is structural: a node renders the same way whether it came
//! from the parser or was assembled by hand.
//!
//! ### Building by hand
//!
//! Nodes are default-constructible and grow through consuming, chainable
//! mutators:
//!
//! ```
//! use fluent_mdx::ast::{Axis, Cube, Member, Query, Tuple};
//!
//! let query = Query::new()
//!     .on(Axis::new("COLUMNS")
//!         .as_non_empty()
//!         .with_slicer(Tuple::new().with(Member::new("Measures").titled("Sales"))))
//!     .from(Cube::new("Cube"));
//!
//! assert_eq!(
//!     query.to_string(),
//!     "SELECT NON EMPTY { [Measures].[Sales] } ON COLUMNS FROM [Cube]"
//! );
//! ```
//!
//! ### Homogeneous nesting
//!
//! A [`Tuple`] holds either flat children (members, ranges, functions) or
//! nested [`Set`]s, never a mix. Appending the first set folds all the flat
//! children collected so far into a new set; later flat children go into the
//! last set. [`Set`] mirrors this with nested tuples.
//!
//! ### The WHERE layer
//!
//! ```text
//! SELECT ... FROM [Cube] WHERE { ( { [Dim].[Key].&[1] } ) }
//! ```
//!
//! The WHERE clause always renders inside one extra `{ ( ... ) }` layer around
//! the list of WHERE tuples. Downstream consumers depend on this exact text.
use std::fmt;

pub mod containers;
pub mod expressions;
pub mod members;
pub mod query;
pub mod tokens;

pub use containers::{Set, SetChild, Tuple, TupleChild};
pub use expressions::{Constant, Expression, Function, Operand};
pub use members::{Member, NavigationFunction, Range};
pub use query::{Axis, Cube, Declaration, DeclarationBody, Query, QuerySource};
pub use tokens::{Token, TokenKind};

/// Writes `items` separated by `separator`.
pub(crate) fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Writes a dotted bracketed identifier: `[p1].[p2].[p3]`.
pub(crate) fn write_bracketed(f: &mut fmt::Formatter<'_>, parts: &[String]) -> fmt::Result {
    f.write_str("[")?;
    write_joined(f, parts, "].[")?;
    f.write_str("]")
}
