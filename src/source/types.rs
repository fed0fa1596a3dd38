//! Source adapter trait and error definitions.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

use crate::quote::Quote;
use crate::resilience::Deadline;

/// Anything that can produce one fresh quote under a deadline.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self, deadline: Deadline) -> SourceResult<Quote>;
}

/// Errors that can occur while fetching a quote from the provider.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The outbound request could not be built (bad URL or method).
    #[error("Failed to build provider request: {0}")]
    RequestConstruction(#[source] reqwest::Error),

    /// Connect, DNS, or transport failure, or the deadline elapsed first.
    #[error("{}", network_message(.deadline_exceeded, .detail))]
    Network {
        deadline_exceeded: bool,
        detail: String,
    },

    /// The provider answered with a non-success status.
    #[error("Provider returned status {0}")]
    UpstreamStatus(StatusCode),

    /// The response body could not be read.
    #[error("Failed to read provider body: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// The body was not a complete quote envelope.
    #[error("Failed to decode provider body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn network_message(deadline_exceeded: &bool, detail: &str) -> String {
    if *deadline_exceeded {
        format!("Provider request deadline exceeded: {detail}")
    } else {
        format!("Provider request failed: {detail}")
    }
}

impl SourceError {
    /// Deadline elapsed while the provider was still working.
    pub fn deadline_exceeded(budget_ms: u128) -> Self {
        SourceError::Network {
            deadline_exceeded: true,
            detail: format!("no complete response within {budget_ms}ms"),
        }
    }

    /// Classify a transport error from reqwest.
    pub fn network(err: reqwest::Error) -> Self {
        SourceError::Network {
            deadline_exceeded: err.is_timeout(),
            detail: err.to_string(),
        }
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(
            self,
            SourceError::Network {
                deadline_exceeded: true,
                ..
            }
        )
    }

    pub fn kind(&self) -> SourceErrorKind {
        match self {
            SourceError::RequestConstruction(_) => SourceErrorKind::RequestConstruction,
            SourceError::Network {
                deadline_exceeded: true,
                ..
            } => SourceErrorKind::DeadlineExceeded,
            SourceError::Network { .. } => SourceErrorKind::Network,
            SourceError::UpstreamStatus(_) => SourceErrorKind::UpstreamStatus,
            SourceError::BodyRead(_) => SourceErrorKind::BodyRead,
            SourceError::Decode(_) => SourceErrorKind::Decode,
        }
    }
}

/// Stable, log-friendly classification of a [`SourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    RequestConstruction,
    DeadlineExceeded,
    Network,
    UpstreamStatus,
    BodyRead,
    Decode,
}

impl SourceErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceErrorKind::RequestConstruction => "RequestConstruction",
            SourceErrorKind::DeadlineExceeded => "DeadlineExceeded",
            SourceErrorKind::Network => "Network",
            SourceErrorKind::UpstreamStatus => "UpstreamStatus",
            SourceErrorKind::BodyRead => "BodyRead",
            SourceErrorKind::Decode => "Decode",
        }
    }
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
