//! Data Transfer Objects (DTOs) for API responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    #[schema(example = "Failed to fetch USD rate")]
    pub error: String,
    /// HTTP status code
    #[schema(example = 500)]
    pub code: u16,
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}
