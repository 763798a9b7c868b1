//! Domain models for the exchange-rate service.

pub mod rate;
pub mod snapshot;

pub use rate::{CENTRAL_BANK_OF_LIBYA, CacheEntry, RateRecord};
pub use snapshot::{RateSnapshot, RateStatus};
