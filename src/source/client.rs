//! HTTP quote provider client with deadline and error classification.
//!
//! # Responsibilities
//! - Issue one GET against the provider per fetch
//! - Bound connect, response, body and decode by the caller's deadline
//! - Drain the body on every path so the connection is released
//! - Translate every failure into a [`SourceError`]

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::config::ProviderConfig;
use crate::quote::{Quote, QuoteEnvelope};
use crate::resilience::Deadline;
use crate::source::types::{QuoteSource, SourceError, SourceResult};

/// Provider adapter holding its own HTTP client.
#[derive(Clone)]
pub struct HttpQuoteSource {
    client: Client,
    url: String,
    pair: String,
}

impl HttpQuoteSource {
    /// Create an adapter for the configured provider.
    pub fn new(config: &ProviderConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create an adapter around an existing client (tests disable pooling).
    pub fn with_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            pair: config.pair.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn exchange(&self, request: reqwest::Request) -> SourceResult<Quote> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(SourceError::network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::network(e)
            } else {
                SourceError::BodyRead(e)
            }
        })?;

        if !status.is_success() {
            tracing::debug!(
                status = %status,
                drained_bytes = body.len(),
                "Provider returned non-success status"
            );
            return Err(SourceError::UpstreamStatus(status));
        }

        let envelope = QuoteEnvelope::decode(&body, &self.pair)?;
        Ok(envelope.quote)
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch(&self, deadline: Deadline) -> SourceResult<Quote> {
        let request = self
            .client
            .request(Method::GET, self.url.as_str())
            .build()
            .map_err(SourceError::RequestConstruction)?;

        tracing::debug!(
            url = %self.url,
            budget_ms = deadline.budget().as_millis() as u64,
            "Fetching quote from provider"
        );

        match deadline.run(self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::deadline_exceeded(deadline.budget().as_millis())),
        }
    }
}
