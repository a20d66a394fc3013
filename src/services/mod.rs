//! Business logic services.

pub mod analysis;
pub mod metrics;
pub mod scoring;
pub mod slither;
pub mod uploads;
