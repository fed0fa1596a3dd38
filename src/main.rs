//! Quote relay service.
//!
//! Serves `GET /cotacao`: fetches the current USD/BRL quote from the remote
//! provider, stores it in SQLite and returns it as JSON.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  QUOTE SERVICE                   │
//!   quote-client     │  ┌─────────┐    ┌────────────┐   fetch deadline  │
//!   ─────────────────┼─▶│  http   │───▶│  /cotacao  │──────────────────┼──▶ quote provider
//!   (own deadline)   │  │ server  │    │  handler   │                   │
//!                    │  └─────────┘    └─────┬──────┘   persist deadline│
//!                    │                       └─────────────────────────┼──▶ SQLite
//!   ◀────────────────┼── JSON envelope | empty 404/500                  │
//!                    │                                                  │
//!                    │  config · observability · lifecycle · resilience │
//!                    └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use quote_relay::config::load_or_default;
use quote_relay::lifecycle::{bootstrap, signals::shutdown_on_signal, Shutdown};
use quote_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "quote-server")]
#[command(about = "Serves the current USD/BRL quote and records each reading", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("quote-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        provider = %config.provider.url,
        store = %config.store.dsn,
        fetch_timeout_ms = config.provider.fetch_timeout_ms,
        persist_timeout_ms = config.store.persist_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let (server, listener) = bootstrap(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
