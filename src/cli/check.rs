//! Parse MDX queries and report their canonical form

use super::CliError;
use crate::{ParseOptions, Parser, Query};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The MDX query to parse
    pub query: String,
    /// Only validate syntax, don't print the canonical query
    pub syntax_only: bool,
    /// Overrides the parser's nesting limit
    pub max_depth: Option<usize>,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Query parsed; holds the tree, which prints as canonical MDX
    Success(Query),
}

impl CheckResult {
    /// `{"valid": true}` plus the canonical query when there is one.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CheckResult::SyntaxValid => serde_json::json!({ "valid": true }),
            CheckResult::Success(query) => serde_json::json!({
                "valid": true,
                "query": query.to_string(),
            }),
        }
    }
}

/// Execute an mdx check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let mut parse_options = ParseOptions::default();
    if let Some(max_depth) = options.max_depth {
        parse_options.max_depth = max_depth;
    }

    let query = Parser::with_options(&options.query, parse_options)?.parse_query()?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }
    Ok(CheckResult::Success(query))
}
