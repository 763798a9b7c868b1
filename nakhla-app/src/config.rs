//! Configuration loading from environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use nakhla_hex::inbound::{CorsPolicy, Environment};
use nakhla_types::RateConfig;

const DEFAULT_PORT: u16 = 3002;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    /// Explicit allow-list replacing the environment's default
    pub cors_origins: Option<Vec<String>>,
    pub rate: RateConfig,
    /// Persist the cache here; in memory when unset
    pub cache_dir: Option<PathBuf>,
    /// Built frontend to serve next to the API
    pub static_dir: Option<PathBuf>,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var("PORT") {
            Some(port) => port.parse().context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        let environment = Environment::from_name(&var("APP_ENV").unwrap_or_default());

        let cors_origins = var("CORS_ALLOWED_ORIGINS").map(|list| {
            list.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        });

        let mut rate = RateConfig::default();
        if let Some(url) = var("UPSTREAM_URL") {
            rate = rate.with_endpoint(url);
        }
        if let Some(timeout) = seconds(&var, "UPSTREAM_TIMEOUT_SECS")? {
            rate = rate.with_timeout(timeout);
        }
        if let Some(ttl) = seconds(&var, "CACHE_TTL_SECS")? {
            rate = rate.with_freshness(ttl);
        }
        if let Some(interval) = seconds(&var, "POLL_INTERVAL_SECS")? {
            rate = rate.with_poll_interval(interval);
        }

        Ok(Self {
            port,
            environment,
            cors_origins,
            rate,
            cache_dir: var("CACHE_DIR").map(PathBuf::from),
            static_dir: var("STATIC_DIR").map(PathBuf::from),
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The CORS policy: the explicit list if given, else the environment's.
    pub fn cors_policy(&self) -> CorsPolicy {
        match &self.cors_origins {
            Some(origins) => CorsPolicy::from_origins(origins),
            None => CorsPolicy::for_environment(self.environment),
        }
    }
}

fn seconds<F>(var: &F, key: &str) -> anyhow::Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = var(key) else {
        return Ok(None);
    };

    let secs: u64 = value
        .parse()
        .with_context(|| format!("{key} must be a whole number of seconds"))?;
    anyhow::ensure!(secs > 0, "{key} must be greater than zero");

    Ok(Some(Duration::from_secs(secs)))
}
