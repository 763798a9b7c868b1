//! Rate source port.
//!
//! This trait defines the interface for upstream rate sources.
//! Implementations can be HTTP clients, mock sources, etc.

use crate::domain::RateRecord;
use crate::error::FetchError;
use crate::upstream::normalize_json;

/// Port trait for the upstream exchange-rate source.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync + 'static {
    /// Fetches the upstream document without interpreting it.
    async fn fetch_raw(&self) -> Result<serde_json::Value, FetchError>;

    /// Fetches and normalizes the current USD rate.
    async fn fetch(&self) -> Result<RateRecord, FetchError> {
        let raw = self.fetch_raw().await?;
        normalize_json(raw)
    }
}
