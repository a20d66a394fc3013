//! Vulnerability rows and the severity tiers shared with the detector catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "severity_tier")]
pub enum Severity {
    Optimization,
    Informational,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimization => write!(f, "Optimization"),
            Self::Informational => write!(f, "Informational"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// A persisted vulnerability belonging to one metrics row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisVulnerability {
    pub id: i64,
    pub metrics_id: Uuid,
    pub vulnerability: String,
    pub severity: Severity,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a vulnerability row.
#[derive(Debug, Clone)]
pub struct NewAnalysisVulnerability {
    pub vulnerability: String,
    pub severity: Severity,
    pub recommendation: String,
}
