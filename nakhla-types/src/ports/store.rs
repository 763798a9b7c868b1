//! Key-value storage port.
//!
//! Text values addressed by a string key. Adapters (file, in-memory)
//! implement this trait; the rate cache is built on top of it.

use crate::error::StoreError;

/// Port for a small persistent key-value store.
///
/// `set` MUST replace the previous value atomically: readers observe
/// either the old or the new value, never a partial write.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
