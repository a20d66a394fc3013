//! Contract routes: upload, analysis and scan lookups.

use std::sync::OnceLock;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Multipart, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::session::SessionId;
use crate::models::metrics::ScoredMetrics;
use crate::models::vulnerability::AnalysisVulnerability;
use crate::services::analysis::{self, AnalysisReport, AnalyzeRequest};
use crate::services::uploads::CONTRACT_FIELD;
use crate::services::{metrics, scoring};
use crate::AppState;

const CONTRACT_PREFIX: &str = "/contract/";

/// Fragments that stale clients splice into contract ids.
static MALFORMED_ID: OnceLock<Regex> = OnceLock::new();

fn malformed_id_fragments() -> &'static Regex {
    MALFORMED_ID.get_or_init(|| Regex::new(r"Object|%20").expect("Invalid malformed-id regex"))
}

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub filename: String,
}

/// POST /contract-upload — store one `.sol` file (multipart field `contractFile`).
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadedFile>>, AppError> {
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let field_name = field.name().unwrap_or("").to_string();
        if field_name != CONTRACT_FIELD {
            return Err(AppError::Validation(format!(
                "Unexpected file field '{field_name}', expected '{CONTRACT_FIELD}'"
            )));
        }
        if file.is_some() {
            return Err(AppError::Validation("Only one file may be uploaded".to_string()));
        }

        state.uploads.validate_name(&original_name)?;
        let data = field.bytes().await?;
        file = Some((original_name, data));
    }

    let (original_name, data) =
        file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let filename = state.uploads.store(&original_name, &data).await?;

    Ok(ApiResponse::success_with_message(
        "File uploaded successfully",
        UploadedFile { filename },
    ))
}

/// POST /contract-analyze — run Slither on a previously uploaded file.
pub async fn analyze(
    State(state): State<AppState>,
    SessionId(session_id): SessionId,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalysisReport>>, AppError> {
    let Json(request) = body?;
    let (project_name, filename) = request.into_parts()?;

    let report = analysis::analyze_contract(
        &state.db,
        &state.uploads,
        &state.slither,
        project_name,
        &filename,
        session_id,
    )
    .await?;

    Ok(ApiResponse::success_with_message(
        "Analysis completed successfully",
        report,
    ))
}

/// GET /contract/{id} — one scan with its scores.
///
/// Reads the raw request path: ids polluted with `Object` or `%20` are
/// redirected to the cleaned path instead of being rejected.
pub async fn get_by_id(State(state): State<AppState>, uri: Uri) -> Result<Response, AppError> {
    let raw_id = uri.path().strip_prefix(CONTRACT_PREFIX).unwrap_or_default();

    if let Some(clean) = cleaned_id(raw_id) {
        tracing::debug!(raw_id = %raw_id, clean_id = %clean, "Redirecting malformed contract id");
        let location = format!("{CONTRACT_PREFIX}{clean}");
        return Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response());
    }

    let id = parse_contract_id(raw_id)?;
    let row = metrics::find_by_id(&state.db, id).await?;
    let scored = ScoredMetrics {
        security_score: scoring::security_score(&row),
        risk_score: scoring::risk_score(&row),
        metrics: row,
    };

    Ok(ApiResponse::success(scored).into_response())
}

/// GET /contract/{id}/vulnerabilities — the scan's findings in insertion order.
pub async fn vulnerabilities(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<ApiResponse<Vec<AnalysisVulnerability>>>, AppError> {
    let raw_id = uri
        .path()
        .strip_prefix(CONTRACT_PREFIX)
        .and_then(|rest| rest.strip_suffix("/vulnerabilities"))
        .unwrap_or_default();
    let id = parse_contract_id(raw_id)?;

    let rows = metrics::list_vulnerabilities(&state.db, id).await?;
    Ok(ApiResponse::success(rows))
}

/// `Some(cleaned)` when the id carries fragments that warrant a redirect.
fn cleaned_id(raw_id: &str) -> Option<String> {
    let re = malformed_id_fragments();
    re.is_match(raw_id)
        .then(|| re.replace_all(raw_id, "").into_owned())
}

/// Ids that are not UUIDs cannot name a stored scan.
fn parse_contract_id(raw_id: &str) -> Result<Uuid, AppError> {
    raw_id
        .parse()
        .map_err(|_| AppError::NotFound("Contract not found".to_string()))
}
