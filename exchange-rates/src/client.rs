//! HTTP adapter for the upstream rate source.

use std::time::Duration;

use reqwest::{
    Client,
    header::{ACCEPT, CACHE_CONTROL, PRAGMA},
};

use nakhla_types::{FetchError, RateConfig, RateSource};

/// Fetches the official rate from the configured upstream endpoint.
///
/// Every request carries `Accept: application/json` and cache-busting
/// headers, and is bounded end to end by the configured timeout.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    endpoint: String,
    timeout: Duration,
    http: Client,
}

impl UpstreamClient {
    /// Creates a client for `config.endpoint` with `config.timeout`.
    pub fn new(config: &RateConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
            http,
        })
    }

    /// Returns the upstream URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl RateSource for UpstreamClient {
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_raw(&self) -> Result<serde_json::Value, FetchError> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Upstream responded with HTTP {}", status);
            return Err(FetchError::Upstream(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::InvalidPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_config() {
        let config = RateConfig::default()
            .with_endpoint("http://localhost:9999/rates")
            .with_timeout(Duration::from_secs(3));
        let client = UpstreamClient::new(&config).unwrap();

        assert_eq!(client.endpoint(), "http://localhost:9999/rates");
        assert_eq!(client.timeout, Duration::from_secs(3));
    }
}
