//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

/// Liveness body. Kept flat (no envelope data) for existing uptime checks.
#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub message: &'static str,
}

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub slither: String,
}

/// GET /health — always OK while the process is running.
pub async fn live() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        message: "Server is running",
    })
}

/// GET /health/ready — checks database connectivity and the analyzer binary.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            format!("error: {e}")
        }
    };

    let slither_status = match state.slither.version().await {
        Ok(version) if !version.is_empty() => version,
        Ok(_) => "unknown version".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Slither health check failed");
            format!("error: {e}")
        }
    };

    ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        database: db_status,
        slither: slither_status,
    })
}
