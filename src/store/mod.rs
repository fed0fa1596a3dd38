//! Quote store adapter subsystem.
//!
//! # Data Flow
//! ```text
//! startup (schema = "startup")
//!     → sqlite.rs initialize() (exactly once)
//! Quote service (persist tier)
//!     → [ensure_schema() when schema = "per_request"]
//!     → sqlite.rs insert() under the persist deadline
//!     → row id | StoreError (types.rs)
//! ```
//!
//! # Design Decisions
//! - One connection per operation; no pool is shared between requests
//! - Prepare and execute failures are distinct error kinds
//! - Every store failure is a value returned to the caller, never a process exit

pub mod sqlite;
pub mod types;

pub use sqlite::SqliteQuoteStore;
pub use types::{QuoteStore, StoreError, StoreErrorKind, StoreResult};
