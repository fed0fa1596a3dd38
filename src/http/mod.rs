//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID set and propagated)
//!     → quote.rs (/cotacao: fetch → persist → respond; anything else: 404)
//!     → response.rs (JSON envelope or empty error body)
//!     → Send to client
//! ```

pub mod quote;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, QUOTE_PATH};
