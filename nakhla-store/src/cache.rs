//! Rate cache on top of a key-value store.

use std::time::Duration;

use chrono::{DateTime, Utc};
use nakhla_types::{CacheEntry, KeyValueStore, RateConfig, RateRecord, StoreError};

/// Cache-level errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache entry is corrupt: {0}")]
    Corrupt(String),

    #[error("Refusing to cache an invalid rate record")]
    InvalidRecord,

    #[error("Cache encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Single-slot cache of the last valid rate.
///
/// The slot is only ever replaced wholesale; a failed fetch leaves it as is.
pub struct RateCache<S: KeyValueStore> {
    store: S,
    key: String,
    freshness: Duration,
}

impl<S: KeyValueStore> RateCache<S> {
    /// Creates a cache using `config.cache_key` and `config.freshness`.
    pub fn new(store: S, config: &RateConfig) -> Self {
        Self {
            store,
            key: config.cache_key.clone(),
            freshness: config.freshness,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Returns true if `entry` is inside the freshness window at `now`.
    pub fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        entry.is_fresh(now, self.freshness)
    }

    /// Reads the entry, reporting corruption and storage failures.
    pub async fn load(&self) -> Result<Option<CacheEntry>, CacheError> {
        let Some(text) = self.store.get(&self.key).await? else {
            return Ok(None);
        };

        let entry: CacheEntry =
            serde_json::from_str(&text).map_err(|e| CacheError::Corrupt(e.to_string()))?;

        if !entry.record.is_valid() {
            return Err(CacheError::Corrupt("stored record fails validation".into()));
        }

        Ok(Some(entry))
    }

    /// Reads the entry, treating any problem as a cache miss.
    ///
    /// A corrupt entry is removed so the next write starts clean.
    pub async fn read(&self) -> Option<CacheEntry> {
        match self.load().await {
            Ok(entry) => entry,
            Err(CacheError::Corrupt(reason)) => {
                tracing::warn!(key = %self.key, "Discarding corrupt cache entry: {}", reason);
                if let Err(e) = self.store.remove(&self.key).await {
                    tracing::warn!(key = %self.key, "Failed to clear corrupt cache entry: {}", e);
                }
                None
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "Cache read failed: {}", e);
                None
            }
        }
    }

    /// Stores `record` as fetched now.
    pub async fn write(&self, record: RateRecord) -> Result<CacheEntry, CacheError> {
        self.put(CacheEntry::new(record, Utc::now())).await
    }

    /// Stores a complete entry, replacing the previous one.
    pub async fn put(&self, entry: CacheEntry) -> Result<CacheEntry, CacheError> {
        if !entry.record.is_valid() {
            return Err(CacheError::InvalidRecord);
        }

        let text = serde_json::to_string(&entry)?;
        self.store.set(&self.key, text).await?;
        Ok(entry)
    }

    /// Removes the entry.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.store.remove(&self.key).await?;
        Ok(())
    }
}
