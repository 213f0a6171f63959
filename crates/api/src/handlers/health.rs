//! Liveness probe.

use serde::Serialize;

use crate::error::AppResult;
use crate::response::ApiResponse;

/// Empty payload; the envelope itself is the answer.
#[derive(Debug, Default, Serialize)]
pub struct HealthPayload {}

/// GET /api/v1/healthcheck
pub async fn health_check() -> AppResult<ApiResponse<HealthPayload>> {
    Ok(ApiResponse::new(
        200,
        HealthPayload::default(),
        "Health check passed",
    ))
}
