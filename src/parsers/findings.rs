//! Vulnerability extraction from a plain `slither <file>` run.

use serde::ser::{Serialize, SerializeTuple, Serializer};

use super::catalog::{self, CatalogEntry};
use super::content_lines;
use crate::models::vulnerability::{NewAnalysisVulnerability, Severity};

/// One detector hit. Serializes as `[name, severity, recommendation]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedVulnerability {
    pub entry: &'static CatalogEntry,
}

impl DetectedVulnerability {
    pub fn name(&self) -> &'static str {
        self.entry.name
    }

    pub fn severity(&self) -> Severity {
        self.entry.severity
    }

    pub fn recommendation(&self) -> &'static str {
        self.entry.recommendation
    }

    pub fn to_new_row(&self) -> NewAnalysisVulnerability {
        NewAnalysisVulnerability {
            vulnerability: self.name().to_string(),
            severity: self.severity(),
            recommendation: self.recommendation().to_string(),
        }
    }
}

impl Serialize for DetectedVulnerability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(self.name())?;
        tuple.serialize_element(&self.severity())?;
        tuple.serialize_element(self.recommendation())?;
        tuple.end()
    }
}

/// Match every non-empty line against the catalog.
///
/// A line yields at most one hit (first catalog entry wins). Hits are not
/// deduplicated: the same detector on N lines yields N results, in line order.
pub fn parse_findings(text: &str) -> Vec<DetectedVulnerability> {
    content_lines(text)
        .filter_map(catalog::lookup)
        .map(|entry| DetectedVulnerability { entry })
        .collect()
}
