//! Wire format of the upstream rate API and its normalization.
//!
//! The upstream answers
//! `{ "status": "success", "data": [{ "buy": "4.85.", "sell": "4.90.", "avg": "4.875.", "date": "..." }] }`.
//! Numbers usually arrive as strings and may carry one stray trailing period.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::RateRecord;
use crate::error::FetchError;

const SUCCESS: &str = "success";

/// Top-level upstream response.
///
/// Entries are kept as raw JSON; only the first one is ever decoded, so a
/// malformed trailing entry cannot fail the fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

/// One currency entry; the first one is USD.
///
/// Fields stay untyped until read: a wrongly typed `avg` or `date` is
/// ignored rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamQuote {
    #[serde(default)]
    pub buy: Option<Value>,
    #[serde(default)]
    pub sell: Option<Value>,
    #[serde(default)]
    pub avg: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
}

impl UpstreamQuote {
    pub fn buy(&self) -> Option<f64> {
        self.buy.as_ref().and_then(number)
    }

    pub fn sell(&self) -> Option<f64> {
        self.sell.as_ref().and_then(number)
    }

    /// The published average, if it is a positive number.
    pub fn avg(&self) -> Option<f64> {
        self.avg.as_ref().and_then(number).filter(|avg| *avg > 0.0)
    }

    /// The published date as text. Numeric dates are kept as written.
    pub fn date(&self) -> Option<String> {
        match self.date.as_ref()? {
            Value::String(date) => Some(date.clone()),
            Value::Number(date) => Some(date.to_string()),
            _ => None,
        }
    }
}

/// Finite value of a numeric field sent either as a string or a number.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(raw) => parse_rate(raw),
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Parses an upstream numeric string, stripping one trailing `.`.
///
/// Returns `None` for anything that is not a finite number.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl UpstreamPayload {
    /// Validates the payload and builds the canonical record.
    pub fn normalize(self) -> Result<RateRecord, FetchError> {
        match self.status.as_deref() {
            Some(SUCCESS) => {}
            other => {
                return Err(FetchError::InvalidPayload(format!(
                    "unexpected status: {}",
                    other.unwrap_or("<missing>")
                )));
            }
        }

        let first = self
            .data
            .and_then(|entries| entries.into_iter().next())
            .ok_or_else(|| FetchError::InvalidPayload("empty data array".into()))?;
        let usd: UpstreamQuote = serde_json::from_value(first)
            .map_err(|e| FetchError::InvalidPayload(format!("malformed USD entry: {}", e)))?;

        let buy = usd.buy().ok_or_else(|| missing("buy"))?;
        let sell = usd.sell().ok_or_else(|| missing("sell"))?;

        Ok(RateRecord::new(buy, sell, usd.avg(), usd.date())?)
    }
}

fn missing(name: &str) -> FetchError {
    FetchError::InvalidPayload(format!("`{}` is missing or not a number", name))
}

/// Deserializes and normalizes a raw upstream JSON document.
pub fn normalize_json(value: serde_json::Value) -> Result<RateRecord, FetchError> {
    let payload: UpstreamPayload = serde_json::from_value(value)
        .map_err(|e| FetchError::InvalidPayload(e.to_string()))?;
    payload.normalize()
}
