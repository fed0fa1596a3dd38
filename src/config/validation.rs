//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (every tier budget > 0)
//! - Check that URLs and the bind address parse
//! - Reject store DSNs that cannot persist across per-request connections
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::resilience::DeadlinePolicy;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("listener.bind_address is not a socket address: {0}")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address is not a socket address: {0}")]
    InvalidMetricsAddress(String),

    #[error("store.dsn must not be empty")]
    EmptyDsn,

    #[error("store.dsn ':memory:' does not survive per-request connections")]
    InMemoryDsn,

    #[error("provider.pair must not be empty")]
    EmptyPair,

    #[error(
        "provider.fetch_timeout_ms + store.persist_timeout_ms ({tiers_ms}ms) must be below listener.request_timeout_ms ({request_ms}ms) under the independent policy"
    )]
    TiersExceedRequest { tiers_ms: u64, request_ms: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("listener.request_timeout_ms", config.listener.request_timeout_ms),
        ("provider.fetch_timeout_ms", config.provider.fetch_timeout_ms),
        ("store.persist_timeout_ms", config.store.persist_timeout_ms),
        ("client.timeout_ms", config.client.timeout_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    for (field, value) in [
        ("provider.url", &config.provider.url),
        ("client.service_url", &config.client.service_url),
    ] {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    match config.store.dsn.trim() {
        "" => errors.push(ValidationError::EmptyDsn),
        ":memory:" => errors.push(ValidationError::InMemoryDsn),
        _ => {}
    }

    if config.provider.pair.trim().is_empty() {
        errors.push(ValidationError::EmptyPair);
    }

    // Chained tiers are capped by the request budget; independent ones are not.
    let tiers_ms = config
        .provider
        .fetch_timeout_ms
        .saturating_add(config.store.persist_timeout_ms);
    if config.deadlines.policy == DeadlinePolicy::Independent
        && tiers_ms >= config.listener.request_timeout_ms
    {
        errors.push(ValidationError::TiersExceedRequest {
            tiers_ms,
            request_ms: config.listener.request_timeout_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
