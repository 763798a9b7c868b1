//! Rate Provider Service
//!
//! Orchestrates the rate source and the rate cache.
//! Contains NO infrastructure logic - pure acquisition policy.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, watch};

use nakhla_store::RateCache;
use nakhla_types::{CacheEntry, KeyValueStore, RateSnapshot, RateSource, RateStatus};

/// Cache-first provider of the current USD/LYD rate.
///
/// Generic over `R: RateSource` and `S: KeyValueStore` - adapters are injected at compile time.
///
/// - A fresh cached rate is returned without touching the network.
/// - Otherwise one fetch is made; concurrent callers share it.
/// - A failed fetch never evicts the cached rate: it stays displayable
///   as last-known-good while the status reports the error.
/// - There is no retry loop; the next attempt is the next poll or an
///   explicit [`RateProvider::refresh`].
pub struct RateProvider<R: RateSource, S: KeyValueStore> {
    source: R,
    cache: RateCache<S>,
    snapshot: watch::Sender<RateSnapshot>,
    fetch_lock: Mutex<()>,
    fetches_completed: AtomicU64,
}

impl<R: RateSource, S: KeyValueStore> RateProvider<R, S> {
    /// Creates a provider in the `Idle` state.
    pub fn new(source: R, cache: RateCache<S>) -> Self {
        let (snapshot, _) = watch::channel(RateSnapshot::idle());
        Self {
            source,
            cache,
            snapshot,
            fetch_lock: Mutex::new(()),
            fetches_completed: AtomicU64::new(0),
        }
    }

    /// Returns a reference to the underlying rate source.
    pub fn source(&self) -> &R {
        &self.source
    }

    /// Returns a reference to the rate cache.
    pub fn cache(&self) -> &RateCache<S> {
        &self.cache
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> RateSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribes to status changes.
    pub fn subscribe(&self) -> watch::Receiver<RateSnapshot> {
        self.snapshot.subscribe()
    }

    /// Returns the current rate, fetching only if the cache is absent or stale.
    #[tracing::instrument(skip(self))]
    pub async fn get_rate(&self) -> RateSnapshot {
        let seen = self.fetches_completed.load(Ordering::Acquire);
        let cached = self.cache.read().await;

        if let Some(entry) = &cached {
            if self.cache.is_fresh(entry, Utc::now()) {
                tracing::debug!(fetched_at = %entry.fetched_at, "Serving fresh cached rate");
                let snapshot = RateSnapshot::ready(entry);
                self.publish_unless_loading(&snapshot);
                return snapshot;
            }
        }

        self.fetch_after(seen, cached).await
    }

    /// Fetches unconditionally (scheduled poll or manual retry).
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> RateSnapshot {
        let seen = self.fetches_completed.load(Ordering::Acquire);
        let cached = self.cache.read().await;
        self.fetch_after(seen, cached).await
    }

    /// Runs one fetch unless another one completed since `seen`, in which
    /// case its outcome is returned instead.
    async fn fetch_after(&self, seen: u64, cached: Option<CacheEntry>) -> RateSnapshot {
        let _guard = self.fetch_lock.lock().await;

        if self.fetches_completed.load(Ordering::Acquire) != seen {
            tracing::debug!("Joining the outcome of a concurrent fetch");
            return self.snapshot();
        }

        let previous = self.snapshot.send_replace(RateSnapshot::loading(cached.as_ref()));
        let loading = LoadingGuard::new(&self.snapshot, previous);

        let snapshot = match self.source.fetch().await {
            Ok(record) => match self.cache.write(record.clone()).await {
                Ok(entry) => {
                    tracing::info!(
                        buy = entry.record.buy,
                        sell = entry.record.sell,
                        average = entry.record.average,
                        "Rate refreshed"
                    );
                    RateSnapshot::ready(&entry)
                }
                Err(e) => {
                    tracing::warn!("Fetched rate could not be cached: {}", e);
                    RateSnapshot::ready(&CacheEntry::new(record, Utc::now()))
                }
            },
            Err(e) => {
                let last_good = self.cache.read().await;
                tracing::warn!(
                    has_last_good = last_good.is_some(),
                    "Rate fetch failed: {}",
                    e
                );
                RateSnapshot::failed(&e, last_good.as_ref())
            }
        };

        loading.disarm();
        self.fetches_completed.fetch_add(1, Ordering::AcqRel);
        self.publish(snapshot.clone());
        snapshot
    }

    fn publish(&self, snapshot: RateSnapshot) {
        self.snapshot.send_replace(snapshot);
    }

    fn publish_unless_loading(&self, snapshot: &RateSnapshot) {
        self.snapshot.send_if_modified(|current| {
            if current.status == RateStatus::Loading || current == snapshot {
                return false;
            }
            *current = snapshot.clone();
            true
        });
    }
}

/// Restores the pre-fetch snapshot if a fetch is abandoned mid-flight
/// (e.g. the caller's future is dropped), so `Loading` never outlives it.
struct LoadingGuard<'a> {
    snapshot: &'a watch::Sender<RateSnapshot>,
    restore: Option<RateSnapshot>,
}

impl<'a> LoadingGuard<'a> {
    fn new(snapshot: &'a watch::Sender<RateSnapshot>, previous: RateSnapshot) -> Self {
        Self {
            snapshot,
            restore: Some(previous),
        }
    }

    fn disarm(mut self) {
        self.restore = None;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.restore.take() {
            tracing::debug!("Rate fetch abandoned, restoring previous status");
            self.snapshot.send_replace(previous);
        }
    }
}
