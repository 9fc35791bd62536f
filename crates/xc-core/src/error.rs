//! Error types for the explain client

use thiserror::Error;

/// Errors that end an explain session or fail a history operation.
///
/// Malformed SSE frames and missing field patterns are deliberately not here:
/// those are recoverable conditions the decoder logs and skips.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// Network-level failure: the session aborts and its in-progress entry is
    /// rolled back.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the explain server.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// History file could not be read or written.
    #[error("history store: {0}")]
    Store(#[from] std::io::Error),

    /// History file exists but is not valid JSON.
    #[error("history file is corrupt: {0}")]
    StoreFormat(#[from] serde_json::Error),
}
