//! HTTP Server configuration and startup.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use nakhla_types::{KeyValueStore, RateSource};

use super::cors::CorsPolicy;
use super::handlers::{self, AppState};
use crate::openapi::ApiDoc;
use crate::{PollerHandle, RateProvider};

/// HTTP Server for the exchange-rate API.
pub struct HttpServer<R: RateSource, S: KeyValueStore> {
    state: Arc<AppState<R, S>>,
    cors: CorsPolicy,
    static_dir: Option<PathBuf>,
    poller: Option<PollerHandle>,
}

impl<R: RateSource, S: KeyValueStore> HttpServer<R, S> {
    /// Creates a new HTTP server around a shared provider.
    pub fn new(provider: Arc<RateProvider<R, S>>, cors: CorsPolicy) -> Self {
        Self {
            state: Arc::new(AppState { provider }),
            cors,
            static_dir: None,
            poller: None,
        }
    }

    /// Serves the built frontend from `dir`, falling back to its `index.html`
    /// for any path no API route matches.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Ties a running poller to the server's lifetime; it is stopped once
    /// the server has shut down.
    pub fn with_poller(mut self, poller: PollerHandle) -> Self {
        self.poller = Some(poller);
        self
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/usd", get(handlers::usd_proxy::<R, S>))
            .route("/api/rate", get(handlers::current_rate::<R, S>))
            .route("/api/rate/refresh", post(handlers::refresh_rate::<R, S>))
            .route("/api/ticker", get(handlers::ticker::<R, S>))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

        if let Some(dir) = &self.static_dir {
            let index = ServeFile::new(dir.join("index.html"));
            router = router.fallback_service(ServeDir::new(dir).fallback(index));
        }

        router
            .layer(metrics)
            .layer(self.cors.layer())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(mut self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let poller = self.poller.take();
        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;

        if let Some(poller) = poller {
            poller.stop().await;
        }

        served?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
