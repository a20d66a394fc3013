//! Metrics extraction from `slither --print human-summary` output.
//!
//! Each line is checked against a fixed list of label phrases (plain
//! substring match). The first label found in a line decides which field the
//! line feeds; the value is the first integer after a colon. A later line for
//! the same label overwrites the earlier value.

use std::sync::OnceLock;

use serde::Serialize;

use super::content_lines;

/// Placeholder stored when no ERC line is present or it is empty.
pub const NO_ERCS: &str = "None";

/// Per-tier issue counters reported by the summary printer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueCounts {
    pub optimization: i32,
    pub informational: i32,
    pub low: i32,
    pub medium: i32,
    pub high: i32,
}

/// Fixed-shape metrics extracted from one summary run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total_contracts: i32,
    pub source_lines: i32,
    pub assembly_lines: i32,
    pub scan_duration: i32,
    pub issues: IssueCounts,
    pub ercs: String,
}

impl ScanSummary {
    fn empty(scan_duration: i32) -> Self {
        Self {
            total_contracts: 0,
            source_lines: 0,
            assembly_lines: 0,
            scan_duration,
            issues: IssueCounts::default(),
            ercs: NO_ERCS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    TotalContracts,
    SourceLines,
    AssemblyLines,
    Optimization,
    Informational,
    Low,
    Medium,
    High,
}

/// Numeric labels in check order.
const NUMERIC_LABELS: &[(&str, Field)] = &[
    ("Total number of contracts", Field::TotalContracts),
    ("Source lines of code", Field::SourceLines),
    ("Number of assembly lines", Field::AssemblyLines),
    ("Number of optimization issues", Field::Optimization),
    ("Number of informational issues", Field::Informational),
    ("Number of low issues", Field::Low),
    ("Number of medium issues", Field::Medium),
    ("Number of high issues", Field::High),
];

const ERCS_LABEL: &str = "ERCs:";

static COLON_NUMBER: OnceLock<regex::Regex> = OnceLock::new();

fn colon_number_regex() -> &'static regex::Regex {
    COLON_NUMBER.get_or_init(|| regex::Regex::new(r":\s*(\d+)").expect("Invalid number regex"))
}

/// First integer following a colon, if any. Values beyond `i32` count as absent.
fn trailing_number(line: &str) -> Option<i32> {
    colon_number_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract summary metrics from normalized output.
///
/// Unmatched labels keep their defaults (`0`, or `"None"` for ERCs).
pub fn parse_summary(text: &str, scan_duration: i32) -> ScanSummary {
    let mut summary = ScanSummary::empty(scan_duration);

    for line in content_lines(text) {
        if let Some((_, field)) = NUMERIC_LABELS.iter().find(|(label, _)| line.contains(label)) {
            if let Some(value) = trailing_number(line) {
                summary.set(*field, value);
            }
        } else if let Some((_, rest)) = line.split_once(ERCS_LABEL) {
            let rest = rest.trim();
            summary.ercs = if rest.is_empty() {
                NO_ERCS.to_string()
            } else {
                rest.to_string()
            };
        }
    }

    summary
}

impl ScanSummary {
    fn set(&mut self, field: Field, value: i32) {
        match field {
            Field::TotalContracts => self.total_contracts = value,
            Field::SourceLines => self.source_lines = value,
            Field::AssemblyLines => self.assembly_lines = value,
            Field::Optimization => self.issues.optimization = value,
            Field::Informational => self.issues.informational = value,
            Field::Low => self.issues.low = value,
            Field::Medium => self.issues.medium = value,
            Field::High => self.issues.high = value,
        }
    }
}
