//! Quote relay library.
//!
//! A chained quote lookup: the client asks the service, the service asks the
//! provider and records the answer. Every hop carries its own deadline.

// Core subsystems
pub mod config;
pub mod http;
pub mod quote;

// Adapters
pub mod source;
pub mod store;

// Client side
pub mod client;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
