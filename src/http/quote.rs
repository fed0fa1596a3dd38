//! `/cotacao` handler.
//!
//! Each request walks Fetching → Persisting → Responding. Any stage failure
//! ends the request with an empty `500`; the classification goes to the log.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use std::time::Instant;

use crate::config::SchemaMode;
use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::quote::QuoteEnvelope;

const FETCH: &str = "fetch";
const PERSIST: &str = "persist";

pub async fn get_quote(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let request_deadline = state.budgets.request_deadline();

    // 1. Fetch
    let fetch_deadline = state.budgets.fetch_deadline(request_deadline);
    let fetch_started = Instant::now();
    let fetched = state.source.fetch(fetch_deadline).await;
    metrics::record_stage(FETCH, fetch_started);

    let quote = match fetched {
        Ok(quote) => quote,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                stage = FETCH,
                kind = %e.kind(),
                deadline_exceeded = e.is_deadline_exceeded(),
                budget_ms = fetch_deadline.budget().as_millis() as u64,
                error = %e,
                "Quote fetch failed"
            );
            metrics::record_failure(FETCH, e.kind().as_str());
            return fail(start_time);
        }
    };

    tracing::debug!(request_id = %request_id, bid = %quote.bid, "Quote fetched");

    // 2. Persist
    if state.schema == SchemaMode::PerRequest {
        if let Err(e) = state.store.ensure_schema().await {
            tracing::error!(
                request_id = %request_id,
                stage = PERSIST,
                kind = %e.kind(),
                error = %e,
                "Schema creation failed"
            );
            metrics::record_failure(PERSIST, e.kind().as_str());
            return fail(start_time);
        }
    }

    let persist_deadline = state.budgets.persist_deadline(request_deadline);
    let persist_started = Instant::now();
    let persisted = state.store.insert(&quote, persist_deadline).await;
    metrics::record_stage(PERSIST, persist_started);

    match persisted {
        Ok(row_id) => {
            tracing::info!(request_id = %request_id, row_id, bid = %quote.bid, "Quote persisted");
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                stage = PERSIST,
                kind = %e.kind(),
                deadline_exceeded = e.is_deadline_exceeded(),
                budget_ms = persist_deadline.budget().as_millis() as u64,
                error = %e,
                "Quote persistence failed"
            );
            metrics::record_failure(PERSIST, e.kind().as_str());
            return fail(start_time);
        }
    }

    // 3. Respond
    metrics::record_request(StatusCode::OK.as_u16(), start_time);
    response::quote(QuoteEnvelope::new(state.pair.as_str(), quote))
}

/// Fallback for every path other than `/cotacao`.
pub async fn not_found(headers: HeaderMap) -> Response {
    tracing::debug!(request_id = %request_id(&headers), "No route matched");
    metrics::record_request(StatusCode::NOT_FOUND.as_u16(), Instant::now());
    response::empty(StatusCode::NOT_FOUND)
}

fn fail(start_time: Instant) -> Response {
    metrics::record_request(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), start_time);
    response::empty(StatusCode::INTERNAL_SERVER_ERROR)
}
