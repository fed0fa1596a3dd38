//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the quote handler and a 404 fallback
//! - Wire up middleware (tracing, request ID, handler ceiling)
//! - Inject adapters through `AppState`
//! - Serve until the shutdown signal fires

use axum::{http::StatusCode, routing::any, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{RelayConfig, SchemaMode};
use crate::http::quote::{get_quote, not_found};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::resilience::TierBudgets;
use crate::source::QuoteSource;
use crate::store::QuoteStore;

/// Path of the single quote endpoint.
pub const QUOTE_PATH: &str = "/cotacao";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn QuoteSource>,
    pub store: Arc<dyn QuoteStore>,
    pub budgets: TierBudgets,
    pub schema: SchemaMode,
    pub pair: String,
}

impl AppState {
    pub fn new(
        config: &RelayConfig,
        source: Arc<dyn QuoteSource>,
        store: Arc<dyn QuoteStore>,
    ) -> Self {
        Self {
            source,
            store,
            budgets: config.tier_budgets(),
            schema: config.store.schema,
            pair: config.provider.pair.clone(),
        }
    }
}

/// HTTP server for the quote service.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server around already-constructed adapters.
    pub fn new(
        config: RelayConfig,
        source: Arc<dyn QuoteSource>,
        store: Arc<dyn QuoteStore>,
    ) -> Self {
        let state = AppState::new(&config, source, store);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The timeout layer is a backstop above every tier budget, so tier
    /// deadlines always fire first and reach the handler's error path.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let ceiling = config.tier_budgets().handler_ceiling();
        Router::new()
            .route(QUOTE_PATH, any(get_quote))
            .fallback(not_found)
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                ceiling,
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Router with state attached, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            fetch_budget_ms = self.config.provider.fetch_timeout_ms,
            persist_budget_ms = self.config.store.persist_timeout_ms,
            handler_ceiling_ms = self.config.tier_budgets().handler_ceiling().as_millis() as u64,
            deadline_policy = ?self.config.deadlines.policy,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
