//! Canonical USD/LYD rate record and its cached wrapper.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Label attached to every record published by the upstream source.
pub const CENTRAL_BANK_OF_LIBYA: &str = "Central Bank of Libya";

fn default_source() -> String {
    CENTRAL_BANK_OF_LIBYA.to_string()
}

/// The normalized official USD/LYD exchange rate.
///
/// A record can only be built through [`RateRecord::new`], which enforces
/// `buy > 0 && sell > 0`. Deserialized records should be checked with
/// [`RateRecord::is_valid`] before being trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateRecord {
    /// Buying rate (LYD per USD)
    #[schema(example = 4.85)]
    pub buy: f64,
    /// Selling rate (LYD per USD)
    #[schema(example = 4.9)]
    pub sell: f64,
    /// Midpoint rate
    #[schema(example = 4.875)]
    pub average: f64,
    /// Date the upstream attributes to this rate, as published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2024-01-01")]
    pub updated_at: Option<String>,
    /// Origin of the rate
    #[serde(default = "default_source")]
    #[schema(example = "Central Bank of Libya")]
    pub source: String,
}

impl RateRecord {
    /// Creates a validated record.
    ///
    /// `average` falls back to the mean of `buy` and `sell` when it is
    /// missing, non-finite or not positive.
    pub fn new(
        buy: f64,
        sell: f64,
        average: Option<f64>,
        updated_at: Option<String>,
    ) -> Result<Self, DomainError> {
        if !(buy.is_finite() && sell.is_finite() && buy > 0.0 && sell > 0.0) {
            return Err(DomainError::InvalidRate { buy, sell });
        }

        let average = average
            .filter(|avg| avg.is_finite() && *avg > 0.0)
            .unwrap_or((buy + sell) / 2.0);

        Ok(Self {
            buy,
            sell,
            average,
            updated_at,
            source: default_source(),
        })
    }

    /// Returns true if the record satisfies the validity invariant.
    pub fn is_valid(&self) -> bool {
        self.buy.is_finite()
            && self.sell.is_finite()
            && self.average.is_finite()
            && self.buy > 0.0
            && self.sell > 0.0
    }

    /// Parses the upstream date into a calendar date, if it has a known shape.
    pub fn updated_on(&self) -> Option<NaiveDate> {
        let raw = self.updated_at.as_deref()?.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }

        ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }
}

/// A rate record together with the wall-clock time it was fetched.
///
/// Persisted as `{ "data": <RateRecord>, "timestamp": <epoch-ms> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "data")]
    pub record: RateRecord,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(record: RateRecord, fetched_at: DateTime<Utc>) -> Self {
        Self { record, fetched_at }
    }

    /// Age of the entry relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now.signed_duration_since(self.fetched_at)
    }

    /// An entry is fresh while `now - fetched_at < window`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        let window = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);
        self.age(now) < window
    }
}
