//! Errors raised while tagging a document.

use thiserror::Error;

/// Failure of one document's tagging pass.
///
/// None of these abort a batch: the document is passed on untagged.
#[derive(Debug, Error)]
pub enum TaggingError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document has no sentences from tokenizer '{tagger_id}'")]
    MissingTokens { tagger_id: String },
}
