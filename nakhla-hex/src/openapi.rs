//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use exchange_rates::{DerivedRate, PairCode, TickerResponse};
use nakhla_types::{ErrorResponse, HealthResponse, RateRecord, RateSnapshot, RateStatus};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
async fn health() {}

/// Upstream rate document, relayed verbatim
#[utoipa::path(
    get,
    path = "/api/usd",
    tag = "rates",
    responses(
        (status = 200, description = "Upstream JSON body, unchanged", body = inline(serde_json::Value),
            example = json!({"status": "success", "data": [{"buy": "4.85", "sell": "4.90", "avg": "4.875", "date": "2024-01-15"}]})),
        (status = 500, description = "Upstream unreachable or failing", body = ErrorResponse,
            example = json!({"error": "Failed to fetch USD rate", "code": 500}))
    )
)]
async fn usd_proxy() {}

/// Current normalized rate, served from cache while fresh
#[utoipa::path(
    get,
    path = "/api/rate",
    tag = "rates",
    responses(
        (status = 200, description = "A displayable rate (possibly stale, see status)", body = RateSnapshot),
        (status = 503, description = "No rate has ever been obtained", body = ErrorResponse)
    )
)]
async fn current_rate() {}

/// Force a fetch from upstream
#[utoipa::path(
    post,
    path = "/api/rate/refresh",
    tag = "rates",
    responses(
        (status = 200, description = "Outcome of the refresh", body = RateSnapshot),
        (status = 503, description = "Refresh failed and no rate is cached", body = ErrorResponse)
    )
)]
async fn refresh_rate() {}

/// Derived ticker pairs
#[utoipa::path(
    get,
    path = "/api/ticker",
    tag = "rates",
    responses(
        (status = 200, description = "USD, EUR and GBP against LYD", body = TickerResponse)
    )
)]
async fn ticker() {}

/// OpenAPI documentation for the exchange-rate API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nakhla Exchange Rate API",
        version = "1.0.0",
        description = "USD/LYD exchange rates from the Central Bank of Libya.\n\nRates are cached for 30 minutes and refreshed hourly. When upstream fails the last known rate keeps being served with `status: error`.",
        license(name = "MIT"),
    ),
    paths(
        health,
        usd_proxy,
        current_rate,
        refresh_rate,
        ticker,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            RateRecord,
            RateSnapshot,
            RateStatus,
            PairCode,
            DerivedRate,
            TickerResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Exchange rate retrieval"),
    )
)]
pub struct ApiDoc;
