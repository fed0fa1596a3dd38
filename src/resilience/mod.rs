//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to the service:
//!     → timeouts.rs (request deadline, chained policy only)
//!     → fetch tier: fresh fetch deadline → provider call
//!     → persist tier: fresh persist deadline → store insert
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries and no circuit breaking: a failed tier fails the request
//! - Deadlines are absolute instants so they can be compared and combined

pub mod timeouts;

pub use timeouts::{Deadline, DeadlinePolicy, TierBudgets, HANDLER_CEILING_MARGIN};
