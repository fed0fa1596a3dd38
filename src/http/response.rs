//! Response construction.
//!
//! # Design Decisions
//! - Failures carry a status code and an empty body; adapter detail stays in
//!   server logs so provider URLs and store paths never reach callers
//! - Success is the quote envelope as JSON, the same shape the provider sends

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::quote::QuoteEnvelope;

/// Status-only response with an empty body.
pub fn empty(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

/// `200` with the envelope as `application/json`.
pub fn quote(envelope: QuoteEnvelope) -> Response {
    (StatusCode::OK, Json(envelope)).into_response()
}
