//! Metrics collection and exposition.
//!
//! # Metrics
//! - `quote_requests_total` (counter): requests by status
//! - `quote_request_duration_seconds` (histogram): end-to-end handler latency
//! - `quote_stage_failures_total` (counter): failures by stage and kind
//! - `quote_stage_duration_seconds` (histogram): fetch and persist latency
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests need no setup
//! - Prometheus exporter only runs when enabled in config

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(status: u16, start: Instant) {
    counter!("quote_requests_total", "status" => status.to_string()).increment(1);
    histogram!("quote_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the latency of a fetch or persist stage.
pub fn record_stage(stage: &'static str, start: Instant) {
    histogram!("quote_stage_duration_seconds", "stage" => stage)
        .record(start.elapsed().as_secs_f64());
}

/// Record a stage failure with its classification.
pub fn record_failure(stage: &'static str, kind: &'static str) {
    counter!("quote_stage_failures_total", "stage" => stage, "kind" => kind).increment(1);
}
