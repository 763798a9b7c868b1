//! # Nakhla Store
//!
//! Concrete storage implementations (adapters) for the exchange-rate service.
//! This crate provides the adapters that implement the `KeyValueStore` port
//! and the `RateCache` built on top of them.

use std::path::Path;

use async_trait::async_trait;
use nakhla_types::{KeyValueStore, StoreError};

pub mod cache;
pub mod file;
pub mod memory;


pub use cache::{CacheError, RateCache};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Unified store wrapper selected at startup.
pub enum Store {
    File(FileStore),
    Memory(MemoryStore),
}

/// Build a store from an optional directory.
///
/// With a directory, entries persist across restarts in JSON files;
/// without one, they live in process memory.
///
/// # Examples
///
/// ```ignore
/// let persistent = build_store(Some(Path::new(".nakhla-cache"))).await?;
/// let ephemeral = build_store(None).await?;
/// ```
pub async fn build_store(dir: Option<&Path>) -> Result<Store, StoreError> {
    match dir {
        Some(dir) => {
            tracing::info!("Using file store at {}", dir.display());
            Ok(Store::File(FileStore::new(dir).await?))
        }
        None => {
            tracing::info!("Using in-memory store");
            Ok(Store::Memory(MemoryStore::new()))
        }
    }
}

#[async_trait]
impl KeyValueStore for Store {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Store::File(store) => store.get(key).await,
            Store::Memory(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        match self {
            Store::File(store) => store.set(key, value).await,
            Store::Memory(store) => store.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Store::File(store) => store.remove(key).await,
            Store::Memory(store) => store.remove(key).await,
        }
    }
}
