//! # Nakhla Client SDK
//!
//! A typed Rust client for the exchange-rate API.

use exchange_rates::TickerResponse;
use nakhla_types::RateSnapshot;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exchange-rate API client.
pub struct RatesClient {
    base_url: String,
    http: Client,
}

impl RatesClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// The upstream document as relayed by the proxy.
    pub async fn usd_raw(&self) -> Result<serde_json::Value, ClientError> {
        self.get("/api/usd").await
    }

    /// The current normalized rate.
    pub async fn rate(&self) -> Result<RateSnapshot, ClientError> {
        self.get("/api/rate").await
    }

    /// Forces the server to refetch.
    pub async fn refresh(&self) -> Result<RateSnapshot, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/rate/refresh", self.base_url))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// The derived ticker pairs.
    pub async fn ticker(&self) -> Result<TickerResponse, ClientError> {
        self.get("/api/ticker").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
