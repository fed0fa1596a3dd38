//! Quote service client.
//!
//! # Responsibilities
//! - GET the service's quote endpoint under one fixed deadline
//! - Decode only the bid from the pair-keyed envelope
//! - Write the bid to a local file
//!
//! # Design Decisions
//! - The deadline is local to the client; nothing is sent to the service
//!   about how much time is left
//! - Timeout classification uses the elapsed timer or reqwest's own timeout
//!   flag, never the error text

use reqwest::{Client, Method};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use crate::client::types::{ClientError, ClientResult};
use crate::config::{ClientConfig, ProviderConfig};
use crate::quote::BidEnvelope;
use crate::resilience::Deadline;

/// Client for the quote service.
#[derive(Clone)]
pub struct QuoteClient {
    client: Client,
    service_url: String,
    pair: String,
    timeout: Duration,
}

impl QuoteClient {
    pub fn new(config: &ClientConfig, provider: &ProviderConfig) -> Self {
        Self::with_client(
            Client::new(),
            &config.service_url,
            &provider.pair,
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn with_client(client: Client, service_url: &str, pair: &str, timeout: Duration) -> Self {
        Self {
            client,
            service_url: service_url.to_string(),
            pair: pair.to_string(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the current bid. The deadline starts when this is called and
    /// covers the request, the response body and decoding.
    pub async fn fetch_bid(&self) -> ClientResult<String> {
        let deadline = Deadline::after(self.timeout);

        let request = self
            .client
            .request(Method::GET, self.service_url.as_str())
            .build()
            .map_err(ClientError::RequestConstruction)?;

        match deadline.run(self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => Err(self.deadline_exceeded()),
        }
    }

    async fn exchange(&self, request: reqwest::Request) -> ClientResult<String> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| self.transport(e))?;
        let envelope = BidEnvelope::decode(&body, &self.pair)?;
        Ok(envelope.bid)
    }

    fn transport(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            self.deadline_exceeded()
        } else {
            ClientError::Transport(err)
        }
    }

    fn deadline_exceeded(&self) -> ClientError {
        ClientError::DeadlineExceeded {
            budget_ms: self.timeout.as_millis() as u64,
        }
    }
}

/// Operator notice for a client-side timeout. Quotes `notice_budget_ms`,
/// which is configured separately from the enforced `timeout_ms`.
pub fn timeout_notice(config: &ClientConfig) -> String {
    format!(
        "Request exceeded the {}ms time limit",
        config.notice_budget_ms
    )
}

/// Overwrite `path` with a single line carrying the bid.
pub async fn write_bid(path: &Path, bid: &str) -> ClientResult<()> {
    let output_error = |source: std::io::Error| ClientError::Output {
        path: path.display().to_string(),
        source,
    };

    let mut file = tokio::fs::File::create(path).await.map_err(output_error)?;
    file.write_all(format!("Dólar: {bid}\n").as_bytes())
        .await
        .map_err(output_error)?;
    file.flush().await.map_err(output_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_notice_uses_its_own_budget() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_ms, 3_000);
        assert_eq!(
            timeout_notice(&config),
            "Request exceeded the 300ms time limit"
        );

        let config = ClientConfig {
            notice_budget_ms: 3_000,
            ..ClientConfig::default()
        };
        assert!(timeout_notice(&config).contains("3000ms"));
    }

    #[tokio::test]
    async fn test_write_bid_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cotacao.txt");

        write_bid(&path, "5.10").await.unwrap();
        write_bid(&path, "5.12").await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "Dólar: 5.12\n");
    }

    #[tokio::test]
    async fn test_write_bid_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cotacao.txt");

        let err = write_bid(&path, "5.12").await.unwrap_err();
        assert!(matches!(err, ClientError::Output { .. }));
        assert!(err.to_string().contains("cotacao.txt"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_construction_error() {
        let client = QuoteClient::with_client(
            Client::new(),
            "not a url",
            "USDBRL",
            Duration::from_secs(1),
        );
        let err = client.fetch_bid().await.unwrap_err();
        assert!(matches!(err, ClientError::RequestConstruction(_)));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_refused_connection_is_not_a_timeout() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = QuoteClient::with_client(
            Client::builder().no_proxy().build().unwrap(),
            &format!("http://{addr}/cotacao"),
            "USDBRL",
            Duration::from_secs(2),
        );
        let err = client.fetch_bid().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "unexpected: {err}");
        assert!(!err.is_timeout());
    }
}
