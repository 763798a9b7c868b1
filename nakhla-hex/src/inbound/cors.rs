//! Cross-origin policy for browser callers.
//!
//! Only the site's own origins may call the API; credentials are allowed.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Origins allowed in production.
pub const PRODUCTION_ORIGINS: &[&str] = &["https://yasinshkab.github.io", "https://alnakhla.ly"];

/// Origins allowed during local development.
pub const DEVELOPMENT_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:3001"];

/// Deployment environment, selecting the default allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    /// `production`/`prod` (any case) is production; anything else is development.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn default_origins(&self) -> &'static [&'static str] {
        match self {
            Environment::Production => PRODUCTION_ORIGINS,
            Environment::Development => DEVELOPMENT_ORIGINS,
        }
    }
}

/// Allow-list of origins permitted to call the API.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Vec<HeaderValue>,
}

impl CorsPolicy {
    /// The built-in allow-list for `env`.
    pub fn for_environment(env: Environment) -> Self {
        Self::from_origins(env.default_origins().iter().copied())
    }

    /// A custom allow-list. Entries that are not valid header values are skipped.
    pub fn from_origins<I, O>(origins: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .filter_map(|origin| {
                let origin = origin.as_ref().trim().trim_end_matches('/');
                if origin.is_empty() {
                    return None;
                }
                match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {:?}", origin);
                        None
                    }
                }
            })
            .collect();

        Self { origins }
    }

    pub fn origins(&self) -> &[HeaderValue] {
        &self.origins
    }

    /// Returns true if `origin` is on the allow-list.
    pub fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    /// Builds the tower-http layer enforcing this policy.
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.clone()))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::CACHE_CONTROL])
            .allow_credentials(true)
    }
}
