//! # Nakhla Types
//!
//! Domain types and port traits for the exchange-rate service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (RateRecord, CacheEntry, RateSnapshot)
//! - `upstream` - Wire format of the upstream rate API and its normalization
//! - `ports/` - Trait definitions that adapters must implement
//! - `config` - The single rate configuration injected into every adapter
//! - `dto` - Data Transfer Objects for API boundaries
//! - `error` - Domain, fetch, storage and application error types

pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;
pub mod upstream;

// Re-export commonly used types
pub use config::RateConfig;
pub use domain::{CENTRAL_BANK_OF_LIBYA, CacheEntry, RateRecord, RateSnapshot, RateStatus};
pub use dto::*;
pub use error::{AppError, DomainError, FetchError, StoreError};
pub use ports::{KeyValueStore, RateSource};
pub use upstream::{UpstreamPayload, UpstreamQuote, normalize_json, parse_rate};
