//! Startup orchestration.
//!
//! # Responsibilities
//! - Construct the provider and store adapters once
//! - Create the quote table before any request can arrive
//! - Bind the listener last (traffic only when ready)
//!
//! # Design Decisions
//! - Startup errors are returned, not panicked on; `main` decides the exit

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{RelayConfig, SchemaMode};
use crate::http::HttpServer;
use crate::source::HttpQuoteSource;
use crate::store::{QuoteStore, SqliteQuoteStore, StoreError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Store initialization failed: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Build adapters, prepare the store, and bind the listener.
pub async fn bootstrap(config: RelayConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let source = Arc::new(HttpQuoteSource::new(&config.provider));
    let store = Arc::new(SqliteQuoteStore::new(&config.store));

    match config.store.schema {
        SchemaMode::Startup => store.initialize().await?,
        SchemaMode::PerRequest => {
            tracing::info!("Schema will be ensured on every request");
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    tracing::info!(
        provider = %source.url(),
        store = %store.path().display(),
        "Adapters ready"
    );

    Ok((HttpServer::new(config, source, store), listener))
}
