//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Service and client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Structured fields (request_id, stage, kind, deadline_exceeded)
//! - Request ID flows from the middleware into every handler log line

pub mod logging;
pub mod metrics;
