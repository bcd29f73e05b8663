//! Aggregator API Client
//!
//! Read-only REST client for the market/position endpoints of the DeFi
//! aggregator. Requests are forwarded as-is and responses shaped into typed
//! rows; there is no caching and no retrying here.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{Market, Position};

#[derive(Debug, Error)]
pub enum MarketsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Aggregator API error {status}: {body}")]
    Api { status: u16, body: String },
}

/// Client for the aggregator's market-data API
#[derive(Debug, Clone)]
pub struct MarketsClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl MarketsClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, MarketsError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// List markets, optionally filtered to one protocol.
    pub async fn list_markets(&self, protocol: Option<&str>) -> Result<Vec<Market>, MarketsError> {
        let mut request = self.http.get(format!("{}/markets", self.base_url));
        if let Some(protocol) = protocol {
            request = request.query(&[("protocol", protocol)]);
        }
        self.fetch(request).await
    }

    /// All positions held by a wallet.
    pub async fn positions(&self, wallet: &str) -> Result<Vec<Position>, MarketsError> {
        let request = self
            .http
            .get(format!("{}/positions/{}", self.base_url, wallet));
        self.fetch(request).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> Result<T, MarketsError> {
        if let Some(ref api_key) = self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketsError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
