//! Security and risk scores derived from a scan's issue counters.
//!
//! Both scores live on a 0–100 scale. Each weighs issues by severity tier and
//! adds an issue-density term relative to the source line count.

use crate::models::metrics::AnalysisMetrics;

/// Per-tier weights, ordered high, medium, low, informational, optimization.
#[derive(Debug, Clone, Copy)]
struct TierWeights([f64; 5]);

const SECURITY_DEDUCTIONS: TierWeights = TierWeights([5.0, 2.0, 1.0, 0.2, 0.1]);
const RISK_ADDITIONS: TierWeights = TierWeights([6.0, 3.0, 1.5, 0.3, 0.2]);

const SECURITY_DENSITY_FACTOR: f64 = 250.0;
const RISK_DENSITY_FACTOR: f64 = 200.0;

impl TierWeights {
    fn apply(&self, m: &AnalysisMetrics) -> f64 {
        let counts = [
            m.high_issues,
            m.medium_issues,
            m.low_issues,
            m.informational_issues,
            m.optimization_issues,
        ];
        counts
            .iter()
            .zip(self.0)
            .map(|(&count, weight)| f64::from(count) * weight)
            .sum()
    }
}

/// `factor · issues / lines`. No issues means no density penalty; issues in a
/// scan without counted lines saturate the score.
fn density(m: &AnalysisMetrics, factor: f64) -> f64 {
    let issues = m.total_issues() as f64;
    if issues == 0.0 {
        0.0
    } else if m.source_lines <= 0 {
        f64::INFINITY
    } else {
        factor * issues / f64::from(m.source_lines)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Higher is safer.
pub fn security_score(m: &AnalysisMetrics) -> f64 {
    let raw = 100.0 - SECURITY_DEDUCTIONS.apply(m) - density(m, SECURITY_DENSITY_FACTOR);
    round2(raw.clamp(0.0, 100.0))
}

/// Higher is riskier.
pub fn risk_score(m: &AnalysisMetrics) -> f64 {
    let raw = RISK_ADDITIONS.apply(m) + density(m, RISK_DENSITY_FACTOR);
    round2(raw.clamp(0.0, 100.0))
}
