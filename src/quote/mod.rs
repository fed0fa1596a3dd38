//! Quote data model.
//!
//! # Data Flow
//! ```text
//! provider body ──decode──▶ QuoteEnvelope ──▶ store insert (Quote fields)
//!                                         └─▶ service response (same envelope shape)
//! service body ──decode──▶ BidEnvelope (client reads only the bid)
//! ```

pub mod types;

pub use types::{BidEnvelope, Quote, QuoteEnvelope};
