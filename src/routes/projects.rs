//! Per-session project listing.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::session::RequireSession;
use crate::models::metrics::ProjectSummary;
use crate::services::{metrics, scoring};
use crate::AppState;

/// GET /projects — scans recorded under the caller's session, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireSession(session_id): RequireSession,
) -> Result<Json<ApiResponse<Vec<ProjectSummary>>>, AppError> {
    let rows = metrics::list_by_session(&state.db, &session_id).await?;

    let projects = rows
        .into_iter()
        .map(|row| ProjectSummary {
            security_score: scoring::security_score(&row),
            metrics: row,
        })
        .collect();

    Ok(ApiResponse::success(projects))
}
