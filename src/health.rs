//! Health check endpoints for load balancers and monitoring

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::AppState;

/// Basic health check - fast, no external dependencies.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness check - verifies the price store is reachable.
pub async fn readyz(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    match state.store.health_check().await {
        Ok(()) => Ok(Json(ReadinessResponse {
            status: "ready".to_string(),
        })),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
}
