//! Quote client subsystem.
//!
//! # Data Flow
//! ```text
//! quote-client binary
//!     → quote_client.rs fetch_bid() under the client deadline
//!     → quote::BidEnvelope::decode
//!     → write_bid() to the output file
//!     → on error: ClientError, with is_timeout() for the operator notice
//! ```

pub mod quote_client;
pub mod types;

pub use quote_client::{timeout_notice, write_bid, QuoteClient};
pub use types::{ClientError, ClientResult};
