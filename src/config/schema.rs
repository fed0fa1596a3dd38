//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default, so an empty file (or no file) yields the
//! reference deployment: provider at awesomeapi, SQLite file in the working
//! directory, service on port 8080.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resilience::timeouts::{DeadlinePolicy, TierBudgets};

/// Root configuration shared by the service and the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration for the quote service.
    pub listener: ListenerConfig,

    /// Remote quote provider.
    pub provider: ProviderConfig,

    /// Relational store for persisted quotes.
    pub store: StoreConfig,

    /// Quote client settings.
    pub client: ClientConfig,

    /// How tier deadlines relate to each other.
    pub deadlines: DeadlineConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// Server-side budgets derived from the provider, store and listener sections.
    pub fn tier_budgets(&self) -> TierBudgets {
        TierBudgets {
            fetch: Duration::from_millis(self.provider.fetch_timeout_ms),
            persist: Duration::from_millis(self.store.persist_timeout_ms),
            request: Duration::from_millis(self.listener.request_timeout_ms),
            policy: self.deadlines.policy,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Hard ceiling on handler time in milliseconds. Also the request-level
    /// budget when deadlines are chained.
    pub request_timeout_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Remote quote provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Full URL of the quote endpoint.
    pub url: String,

    /// Envelope key the provider nests the quote under (e.g., "USDBRL").
    pub pair: String,

    /// Budget for one fetch (connect + response + decode) in milliseconds.
    pub fetch_timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: "https://economia.awesomeapi.com.br/json/last/USD-BRL".to_string(),
            pair: "USDBRL".to_string(),
            fetch_timeout_ms: 2_000,
        }
    }
}

/// When the quote table is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMode {
    /// Once, before the listener accepts traffic.
    #[default]
    Startup,
    /// Before every insert.
    PerRequest,
}

/// Relational store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file path.
    pub dsn: String,

    /// Budget for one insert in milliseconds.
    pub persist_timeout_ms: u64,

    /// Schema creation strategy.
    pub schema: SchemaMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dsn: "./cotacoes.db".to_string(),
            persist_timeout_ms: 100,
            schema: SchemaMode::Startup,
        }
    }
}

/// Quote client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of the service's quote endpoint.
    pub service_url: String,

    /// Enforced client deadline in milliseconds.
    pub timeout_ms: u64,

    /// Budget quoted in the operator timeout notice. Independent of
    /// `timeout_ms`, which is what actually bounds the call.
    pub notice_budget_ms: u64,

    /// File the bid is written to.
    pub output_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8080/cotacao".to_string(),
            timeout_ms: 3_000,
            notice_budget_ms: 300,
            output_path: "cotacao.txt".to_string(),
        }
    }
}

/// Deadline relationship between tiers.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeadlineConfig {
    pub policy: DeadlinePolicy,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
