//! Quote source adapter subsystem.
//!
//! # Data Flow
//! ```text
//! Quote service (fetch tier)
//!     → client.rs (GET provider under the fetch deadline)
//!     → quote::QuoteEnvelope::decode (all-or-nothing)
//!     → Quote | SourceError (types.rs)
//! ```
//!
//! # Design Decisions
//! - The adapter owns its reqwest client; nothing uses a process-wide default
//! - Deadline expiry drops the request future, aborting the connection
//! - Deadline-exceeded is a flag on the network failure, never a message match

pub mod client;
pub mod types;

pub use client::HttpQuoteSource;
pub use types::{QuoteSource, SourceError, SourceErrorKind, SourceResult};
