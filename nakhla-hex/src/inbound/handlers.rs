//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use exchange_rates::TickerResponse;
use nakhla_types::{AppError, ErrorResponse, HealthResponse, KeyValueStore, RateSnapshot, RateSource};

use crate::RateProvider;

/// Body of every failed proxy call, whatever went wrong upstream.
pub const PROXY_FAILURE: &str = "Failed to fetch USD rate";

/// Application state shared across handlers.
pub struct AppState<R: RateSource, S: KeyValueStore> {
    pub provider: Arc<RateProvider<R, S>>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = ErrorResponse {
            error: message,
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
    })
}

/// Relay the upstream document unchanged.
#[tracing::instrument(skip(state))]
pub async fn usd_proxy<R: RateSource, S: KeyValueStore>(
    State(state): State<Arc<AppState<R, S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .provider
        .source()
        .fetch_raw()
        .await
        .map_err(|e| {
            tracing::error!("Error fetching USD rate: {}", e);
            AppError::Internal(PROXY_FAILURE.into())
        })?;

    Ok(Json(body))
}

/// Current normalized rate (cache-first).
#[tracing::instrument(skip(state))]
pub async fn current_rate<R: RateSource, S: KeyValueStore>(
    State(state): State<Arc<AppState<R, S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.provider.get_rate().await;
    displayable(snapshot)
}

/// Force a refresh (the "Retry" action).
#[tracing::instrument(skip(state))]
pub async fn refresh_rate<R: RateSource, S: KeyValueStore>(
    State(state): State<Arc<AppState<R, S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.provider.refresh().await;
    displayable(snapshot)
}

/// Derived ticker pairs.
#[tracing::instrument(skip(state))]
pub async fn ticker<R: RateSource, S: KeyValueStore>(
    State(state): State<Arc<AppState<R, S>>>,
) -> impl IntoResponse {
    let snapshot = state.provider.get_rate().await;
    Json(TickerResponse::from_snapshot(&snapshot))
}

/// A snapshot with a rate is served even when stale; without one the
/// service is unavailable.
fn displayable(snapshot: RateSnapshot) -> Result<Json<RateSnapshot>, ApiError> {
    if snapshot.is_available() {
        return Ok(Json(snapshot));
    }

    let reason = snapshot
        .error
        .unwrap_or_else(|| "No exchange rate available".into());
    Err(AppError::ServiceUnavailable(reason).into())
}
