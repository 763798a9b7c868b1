//! # Nakhla Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the store adapter and the rate cache
//! - Create the rate provider and start its poller
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::UpstreamClient;
use nakhla_hex::{RateProvider, inbound::HttpServer};
use nakhla_store::{RateCache, build_store};

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("nakhla-rates"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize OpenTelemetry tracing when a collector is configured
    let otel = config
        .otlp_endpoint
        .as_deref()
        .map(init_tracer)
        .transpose()?;
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,nakhla_app=debug,nakhla_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!(
        "Starting exchange-rate server on port {} ({:?})",
        config.port,
        config.environment
    );
    tracing::info!("Upstream: {}", config.rate.endpoint);

    // Build the store (file-backed when CACHE_DIR is set)
    let store = build_store(config.cache_dir.as_deref()).await?;
    let cache = RateCache::new(store, &config.rate);

    // Create the provider and keep it warm
    let client = UpstreamClient::new(&config.rate)?;
    let provider = Arc::new(RateProvider::new(client, cache));
    let poller = provider.start_polling(config.rate.poll_interval);

    // Create and run the HTTP server
    let mut server = HttpServer::new(provider, config.cors_policy()).with_poller(poller);
    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving static files from {}", dir.display());
        server = server.with_static_dir(dir.clone());
    }
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
