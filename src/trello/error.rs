//! Error types for Trello API operations.

use thiserror::Error;

/// Errors that can occur during Trello API operations.
#[derive(Debug, Error)]
pub enum TrelloError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response.
    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// No board or list with the requested name is visible to this token.
    #[error("Unable to find a {kind} named [{name}]")]
    NotFound { kind: &'static str, name: String },

    /// Response body did not match the expected shape.
    #[error("Malformed API response: {0}")]
    Decode(#[from] serde_json::Error),
}
