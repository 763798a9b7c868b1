//! Rate acquisition configuration.

use std::time::Duration;

/// Default upstream endpoint republishing the Central Bank of Libya rate.
pub const DEFAULT_UPSTREAM_URL: &str = "https://cbl-proxy.alharethalalem.workers.dev/";

/// Key under which the last valid rate is persisted.
pub const DEFAULT_CACHE_KEY: &str = "usd-rate-cache";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Single configuration shared by the fetcher, the cache and the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateConfig {
    /// Upstream endpoint URL
    pub endpoint: String,
    /// Bound on a single fetch, connect through body
    pub timeout: Duration,
    /// Maximum age of a cached rate served without refetching
    pub freshness: Duration,
    /// Storage key of the cached entry
    pub cache_key: String,
    /// Interval of the scheduled refresh
    pub poll_interval: Duration,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_UPSTREAM_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            freshness: DEFAULT_FRESHNESS,
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RateConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
