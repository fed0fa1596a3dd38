//! Store adapter trait and error definitions.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::quote::Quote;
use crate::resilience::Deadline;

/// Persistence for quotes.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// One-time schema creation. Concurrent callers share a single attempt;
    /// a failed attempt may be retried by a later call.
    async fn initialize(&self) -> StoreResult<()>;

    /// Idempotent "create table if absent".
    async fn ensure_schema(&self) -> StoreResult<()>;

    /// Insert one row under `deadline`, returning its auto-numbered id.
    async fn insert(&self, quote: &Quote, deadline: Deadline) -> StoreResult<i64>;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened.
    #[error("Failed to open store: {0}")]
    Connection(#[source] rusqlite::Error),

    /// The quote table could not be created.
    #[error("Failed to ensure schema: {0}")]
    Schema(#[source] rusqlite::Error),

    /// The insert statement could not be prepared.
    #[error("Failed to prepare insert: {0}")]
    PreparedStatement(#[source] rusqlite::Error),

    /// The insert ran but did not complete.
    #[error("{}", exec_message(.deadline_exceeded, .detail))]
    PersistenceExec {
        deadline_exceeded: bool,
        detail: String,
    },

    /// A read-only query failed.
    #[error("Store query failed: {0}")]
    Query(#[source] rusqlite::Error),

    /// The blocking worker running the statement panicked or was cancelled.
    #[error("Store worker failed: {0}")]
    Worker(String),
}

fn exec_message(deadline_exceeded: &bool, detail: &str) -> String {
    if *deadline_exceeded {
        format!("Insert deadline exceeded: {detail}")
    } else {
        format!("Failed to execute insert: {detail}")
    }
}

impl StoreError {
    /// Deadline elapsed before or during execution.
    pub fn exec_deadline_exceeded(budget_ms: u128) -> Self {
        StoreError::PersistenceExec {
            deadline_exceeded: true,
            detail: format!("not committed within {budget_ms}ms"),
        }
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(
            self,
            StoreError::PersistenceExec {
                deadline_exceeded: true,
                ..
            }
        )
    }

    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Connection(_) => StoreErrorKind::Connection,
            StoreError::Schema(_) => StoreErrorKind::Schema,
            StoreError::PreparedStatement(_) => StoreErrorKind::PreparedStatement,
            StoreError::PersistenceExec {
                deadline_exceeded: true,
                ..
            } => StoreErrorKind::DeadlineExceeded,
            StoreError::PersistenceExec { .. } => StoreErrorKind::PersistenceExec,
            StoreError::Query(_) => StoreErrorKind::Query,
            StoreError::Worker(_) => StoreErrorKind::Worker,
        }
    }
}

/// Stable, log-friendly classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Connection,
    Schema,
    PreparedStatement,
    DeadlineExceeded,
    PersistenceExec,
    Query,
    Worker,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorKind::Connection => "Connection",
            StoreErrorKind::Schema => "Schema",
            StoreErrorKind::PreparedStatement => "PreparedStatement",
            StoreErrorKind::DeadlineExceeded => "DeadlineExceeded",
            StoreErrorKind::PersistenceExec => "PersistenceExec",
            StoreErrorKind::Query => "Query",
            StoreErrorKind::Worker => "Worker",
        }
    }
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
