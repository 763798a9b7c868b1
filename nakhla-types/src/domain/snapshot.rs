//! Observable provider state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::rate::{CacheEntry, RateRecord};
use crate::error::FetchError;

/// Lifecycle status of the rate provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RateStatus {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The rate is current
    Ready,
    /// The last fetch failed
    Error,
}

/// What presentation surfaces render.
///
/// `rate` is the displayable value: the fresh record when `Ready`, the
/// last-known-good record (possibly stale) otherwise, or `None` when no
/// valid rate was ever obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateSnapshot {
    pub status: RateStatus,
    pub rate: Option<RateRecord>,
    /// When the displayed rate was fetched
    pub fetched_at: Option<DateTime<Utc>>,
    /// Reason for the last failure, when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RateSnapshot {
    pub fn idle() -> Self {
        Self {
            status: RateStatus::Idle,
            rate: None,
            fetched_at: None,
            error: None,
        }
    }

    /// A fetch is in flight; `last_good` stays displayable meanwhile.
    pub fn loading(last_good: Option<&CacheEntry>) -> Self {
        Self {
            status: RateStatus::Loading,
            rate: last_good.map(|entry| entry.record.clone()),
            fetched_at: last_good.map(|entry| entry.fetched_at),
            error: None,
        }
    }

    pub fn ready(entry: &CacheEntry) -> Self {
        Self {
            status: RateStatus::Ready,
            rate: Some(entry.record.clone()),
            fetched_at: Some(entry.fetched_at),
            error: None,
        }
    }

    /// A failed fetch; `last_good` stays displayable if present.
    pub fn failed(err: &FetchError, last_good: Option<&CacheEntry>) -> Self {
        Self {
            status: RateStatus::Error,
            rate: last_good.map(|entry| entry.record.clone()),
            fetched_at: last_good.map(|entry| entry.fetched_at),
            error: Some(err.to_string()),
        }
    }

    /// Returns true if there is a rate to display.
    pub fn is_available(&self) -> bool {
        self.rate.is_some()
    }

    pub fn average(&self) -> Option<f64> {
        self.rate.as_ref().map(|rate| rate.average)
    }
}

impl Default for RateSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}
