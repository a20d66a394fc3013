//! Database models and DTOs for scan results.

pub mod metrics;
pub mod vulnerability;
