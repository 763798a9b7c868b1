//! Error types for the exchange-rate service.

use std::time::Duration;

/// Domain-level errors (validation rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid rate: buy {buy}, sell {sell} (both must be positive)")]
    InvalidRate { buy: f64, sell: f64 },
}

/// Errors raised while acquiring a rate from the upstream source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream error: HTTP {0}")]
    Upstream(u16),

    #[error("Invalid upstream payload: {0}")]
    InvalidPayload(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<DomainError> for FetchError {
    fn from(err: DomainError) -> Self {
        FetchError::InvalidPayload(err.to_string())
    }
}

/// Storage-level errors (key-value backend failures).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
