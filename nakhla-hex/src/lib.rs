//! # Nakhla Hex
//!
//! Application service layer and HTTP adapter for the exchange-rate service.
//!
//! ## Architecture
//!
//! - `service/` - Rate provider (cache-first orchestration of fetch and cache)
//! - `poller/` - Scheduled refresh owned by the provider
//! - `inbound/` - HTTP adapter (Axum server: proxy, rate, ticker, CORS)
//!
//! The provider is generic over `R: RateSource` and `S: KeyValueStore`,
//! allowing different upstreams and storage backends to be injected.

pub mod inbound;
pub mod openapi;
pub mod poller;
pub mod service;


pub use poller::PollerHandle;
pub use service::RateProvider;
