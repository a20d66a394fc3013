//! Contract analysis pipeline with an explicit per-request state machine.
//!
//! `UploadPending → Uploaded → Analyzing → Parsed → Persisted → CleanedUp`,
//! with `Failed` reachable from `Analyzing`, `Parsed` and `Persisted`.
//! Whatever happens after the file is located, the file is removed before
//! the request finishes.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::metrics::NewAnalysisMetrics;
use crate::parsers::findings::{self, DetectedVulnerability};
use crate::parsers::summary::{self, ScanSummary, NO_ERCS};
use crate::parsers::normalize_output;
use crate::services::metrics;
use crate::services::slither::SlitherRunner;
use crate::services::uploads::UploadStore;

/// Stored when the checklist report came back empty.
const NO_CHECKLIST: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalysisStage {
    UploadPending,
    Uploaded,
    Analyzing,
    Parsed,
    Persisted,
    CleanedUp,
    Failed,
}

/// Check whether a stage change is an edge of the pipeline graph.
pub fn is_valid_transition(from: AnalysisStage, to: AnalysisStage) -> bool {
    use AnalysisStage::*;
    matches!(
        (from, to),
        (UploadPending, Uploaded)
            | (Uploaded, Analyzing)
            | (Analyzing, Parsed)
            | (Parsed, Persisted)
            | (Persisted, CleanedUp)
            | (Analyzing, Failed)
            | (Parsed, Failed)
            | (Persisted, Failed)
    )
}

/// Current stage of one analysis request.
#[derive(Debug)]
struct StageTracker<'a> {
    filename: &'a str,
    stage: AnalysisStage,
}

impl<'a> StageTracker<'a> {
    fn new(filename: &'a str) -> Self {
        Self {
            filename,
            stage: AnalysisStage::UploadPending,
        }
    }

    fn advance(&mut self, to: AnalysisStage) -> Result<(), AppError> {
        if !is_valid_transition(self.stage, to) {
            return Err(AppError::Internal(format!(
                "Invalid analysis transition from {:?} to {to:?}",
                self.stage
            )));
        }
        tracing::debug!(filename = %self.filename, from = ?self.stage, to = ?to, "Analysis stage");
        self.stage = to;
        Ok(())
    }

    /// Move to `Failed` if the current stage allows it.
    fn fail(&mut self, error: &AppError) {
        if is_valid_transition(self.stage, AnalysisStage::Failed) {
            tracing::warn!(filename = %self.filename, stage = ?self.stage, error = %error, "Analysis failed");
            self.stage = AnalysisStage::Failed;
        }
    }
}

/// Body of `POST /contract-analyze`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[validate(required, length(min = 1))]
    pub project_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub filename: Option<String>,
}

impl AnalyzeRequest {
    /// Validate and split into `(project_name, filename)`.
    /// Whitespace-only values count as missing.
    pub fn into_parts(self) -> Result<(String, String), AppError> {
        let missing = || AppError::Validation("Project name and filename are required".to_string());
        let request = self.trimmed();
        if let Err(errors) = request.validate() {
            tracing::debug!(errors = %errors, "Rejected analysis request");
            return Err(missing());
        }
        request.project_name.zip(request.filename).ok_or_else(missing)
    }

    fn trimmed(self) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        Self {
            project_name: trim(self.project_name),
            filename: trim(self.filename),
        }
    }
}

/// Result of a completed analysis, as returned to the client.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    #[serde(rename = "projectName")]
    pub project_name: String,
    pub metrics: ScanSummary,
    pub vulnerabilities: Vec<DetectedVulnerability>,
    pub timestamp: DateTime<Utc>,
    pub id: Uuid,
    pub markdown_content: String,
}

/// Whole seconds, rounded down.
pub fn duration_secs(elapsed: Duration) -> i32 {
    i32::try_from(elapsed.as_secs()).unwrap_or(0)
}

/// Run Slither on an uploaded file, persist the results and remove the file.
pub async fn analyze_contract(
    pool: &PgPool,
    uploads: &UploadStore,
    slither: &SlitherRunner,
    project_name: String,
    filename: &str,
    session_id: Option<String>,
) -> Result<AnalysisReport, AppError> {
    let mut tracker = StageTracker::new(filename);

    let path = uploads.locate(filename).await?;
    tracker.advance(AnalysisStage::Uploaded)?;

    tracing::info!(project_name = %project_name, filename = %filename, "Analyzing contract");

    let result = run_pipeline(pool, slither, &path, &mut tracker, project_name, session_id).await;

    uploads.remove(&path).await;

    match result {
        Ok(report) => {
            tracker.advance(AnalysisStage::CleanedUp)?;
            tracing::info!(
                metrics_id = %report.id,
                vulnerabilities = report.vulnerabilities.len(),
                "Analysis completed"
            );
            Ok(report)
        }
        Err(e) => {
            tracker.fail(&e);
            Err(e)
        }
    }
}

async fn run_pipeline(
    pool: &PgPool,
    slither: &SlitherRunner,
    path: &Path,
    tracker: &mut StageTracker<'_>,
    project_name: String,
    session_id: Option<String>,
) -> Result<AnalysisReport, AppError> {
    tracker.advance(AnalysisStage::Analyzing)?;

    let started = Instant::now();
    let summary_output = slither.summary(path).await?;
    let scan_duration = duration_secs(started.elapsed());

    let full_output = slither.full(path).await?;

    let scan = summary::parse_summary(&normalize_output(&summary_output), scan_duration);
    let vulnerabilities = findings::parse_findings(&normalize_output(&full_output));
    tracker.advance(AnalysisStage::Parsed)?;

    let markdown_content = slither.checklist(path).await;

    let rows: Vec<_> = vulnerabilities.iter().map(DetectedVulnerability::to_new_row).collect();
    let new_metrics = new_metrics_row(&project_name, session_id, &scan, &markdown_content);
    let stored = metrics::persist_analysis(pool, &new_metrics, &rows).await?;
    tracker.advance(AnalysisStage::Persisted)?;

    Ok(AnalysisReport {
        project_name,
        metrics: scan,
        vulnerabilities,
        timestamp: Utc::now(),
        id: stored.id,
        markdown_content,
    })
}

fn new_metrics_row(
    project_name: &str,
    session_id: Option<String>,
    scan: &ScanSummary,
    markdown_content: &str,
) -> NewAnalysisMetrics {
    let ercs = if scan.ercs.trim().is_empty() {
        NO_ERCS.to_string()
    } else {
        scan.ercs.clone()
    };
    let markdown_content = if markdown_content.is_empty() {
        NO_CHECKLIST.to_string()
    } else {
        markdown_content.to_string()
    };

    NewAnalysisMetrics {
        project_name: project_name.to_string(),
        session_id,
        total_contracts: scan.total_contracts,
        source_lines: scan.source_lines,
        assembly_lines: scan.assembly_lines,
        scan_duration: scan.scan_duration,
        optimization_issues: scan.issues.optimization,
        informational_issues: scan.issues.informational,
        low_issues: scan.issues.low,
        medium_issues: scan.issues.medium,
        high_issues: scan.issues.high,
        ercs,
        markdown_content,
    }
}
