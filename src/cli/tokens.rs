//! Dump the token stream of an MDX query

use super::CliError;
use crate::{Token, tokenize};

/// Options for the tokens command
#[derive(Debug, Clone, Default)]
pub struct TokensOptions {
    /// The MDX text to tokenize
    pub query: String,
}

/// Tokenize the trimmed query. The end sentinel is left out.
pub fn execute_tokens(options: &TokensOptions) -> Result<Vec<Token>, CliError> {
    let mut tokens = tokenize(options.query.trim())?;
    tokens.retain(|token| !token.is_end());
    Ok(tokens)
}

/// `[{"kind": "Select", "text": "SELECT"}, ...]`
pub fn tokens_to_json(tokens: &[Token]) -> serde_json::Value {
    tokens
        .iter()
        .map(|token| {
            serde_json::json!({
                "kind": token.kind.to_string(),
                "text": token.text,
            })
        })
        .collect()
}
