//! JSON extraction from raw LLM output.
//!
//! Judge models are instructed to return only a JSON object, but they still
//! wrap it in prose or markdown fences often enough that the raw reply
//! cannot be parsed directly.

use thiserror::Error;

/// Why a reply could not be turned into a JSON object.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The reply contains no `{...}` span at all.
    #[error("no JSON object found in LLM output")]
    NotFound,

    /// A `{...}` span was found but did not parse as JSON.
    #[error("malformed JSON in LLM output: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Extract the first JSON object found in a string.
///
/// Takes the span from the first `{` to the last `}` and parses it, which
/// strips any surrounding prose or code fences.
pub fn extract_json(text: &str) -> Result<serde_json::Value, ExtractError> {
    let start = text.find('{').ok_or(ExtractError::NotFound)?;
    let end = text.rfind('}').ok_or(ExtractError::NotFound)?;
    if end < start {
        return Err(ExtractError::NotFound);
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}
