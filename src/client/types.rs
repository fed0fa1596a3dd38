//! Client error definitions.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while asking the service for a quote.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to build request: {0}")]
    RequestConstruction(#[source] reqwest::Error),

    /// The client's own deadline elapsed before a full answer arrived.
    #[error("Request exceeded its {budget_ms}ms deadline")]
    DeadlineExceeded { budget_ms: u64 },

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Service returned status {0}")]
    Status(StatusCode),

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// True only when the client's deadline fired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::DeadlineExceeded { .. })
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
