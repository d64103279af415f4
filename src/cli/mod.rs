//! CLI support for fluent-mdx
//!
//! Provides programmatic access to the `mdx` command-line operations so they
//! can be embedded in other tools without going through clap.

mod check;
mod docs;
mod tokens;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use tokens::{TokensOptions, execute_tokens, tokens_to_json};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Lex error: {0}")]
    Lex(#[from] crate::LexError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No query provided. Pass it as an argument or pipe it to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'mdx docs' to see available categories.")]
    UnknownCategory(String),
}

impl CliError {
    /// `{"valid": false, "error": "..."}`, the `--json` failure report.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "valid": false,
            "error": self.to_string(),
        })
    }
}
