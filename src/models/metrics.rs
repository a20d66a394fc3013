//! Per-scan metrics rows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted summary record per contract scan.
///
/// Maps to the `slither_metrics` table. Numeric columns are `NOT NULL DEFAULT 0`,
/// so a row never carries missing counters.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisMetrics {
    pub id: Uuid,
    pub project_name: String,
    pub session_id: Option<String>,
    pub total_contracts: i32,
    pub source_lines: i32,
    pub assembly_lines: i32,
    pub scan_duration: i32,
    pub optimization_issues: i32,
    pub informational_issues: i32,
    pub low_issues: i32,
    pub medium_issues: i32,
    pub high_issues: i32,
    pub ercs: String,
    pub markdown_content: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisMetrics {
    /// Sum of all five severity counters.
    pub fn total_issues(&self) -> i64 {
        [
            self.optimization_issues,
            self.informational_issues,
            self.low_issues,
            self.medium_issues,
            self.high_issues,
        ]
        .iter()
        .map(|&n| i64::from(n))
        .sum()
    }
}

/// Input for inserting a metrics row.
#[derive(Debug, Clone)]
pub struct NewAnalysisMetrics {
    pub project_name: String,
    pub session_id: Option<String>,
    pub total_contracts: i32,
    pub source_lines: i32,
    pub assembly_lines: i32,
    pub scan_duration: i32,
    pub optimization_issues: i32,
    pub informational_issues: i32,
    pub low_issues: i32,
    pub medium_issues: i32,
    pub high_issues: i32,
    pub ercs: String,
    pub markdown_content: String,
}

/// Metrics row extended with the computed security score, as listed per session.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub metrics: AnalysisMetrics,
    pub security_score: f64,
}

/// Metrics row with both computed scores, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMetrics {
    #[serde(flatten)]
    pub metrics: AnalysisMetrics,
    pub security_score: f64,
    pub risk_score: f64,
}

#[cfg(test)]
pub(crate) fn sample_metrics() -> AnalysisMetrics {
    AnalysisMetrics {
        id: Uuid::nil(),
        project_name: "Vault".to_string(),
        session_id: Some("session-1".to_string()),
        total_contracts: 2,
        source_lines: 100,
        assembly_lines: 0,
        scan_duration: 3,
        optimization_issues: 0,
        informational_issues: 0,
        low_issues: 0,
        medium_issues: 0,
        high_issues: 0,
        ercs: "None".to_string(),
        markdown_content: "None".to_string(),
        created_at: Utc::now(),
    }
}
