use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use quote_relay::client::{timeout_notice, write_bid, ClientError, QuoteClient};
use quote_relay::config::{load_or_default, RelayConfig};
use quote_relay::observability::logging;

#[derive(Parser)]
#[command(name = "quote-client")]
#[command(about = "Fetches the current USD/BRL bid from the quote service", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `client.service_url`.
    #[arg(short, long)]
    url: Option<String>,

    /// Override `client.timeout_ms`. Must be at least 1.
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Override `client.output_path`.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_level);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(cli: Cli, config: RelayConfig) -> Result<(), ClientError> {
    let mut client_config = config.client.clone();
    if let Some(url) = cli.url {
        client_config.service_url = url;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        client_config.timeout_ms = timeout_ms;
    }
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&client_config.output_path));

    let client = QuoteClient::new(&client_config, &config.provider);

    let bid = match client.fetch_bid().await {
        Ok(bid) => bid,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch quote");
            if e.is_timeout() {
                tracing::warn!(
                    enforced_ms = client.timeout().as_millis() as u64,
                    "{}",
                    timeout_notice(&client_config)
                );
            }
            return Err(e);
        }
    };

    println!("Cotação do Dólar: {}", bid);

    if let Err(e) = write_bid(&output, &bid).await {
        tracing::error!(error = %e, "Failed to write quote file");
        return Err(e);
    }

    tracing::info!(path = %output.display(), "Quote written");
    Ok(())
}
