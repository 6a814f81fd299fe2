//! qbrgen - quarterly conversion-review report generator
//!
//! Reads CSV metric data measured over two fixed comparison windows
//! (pre- and post-implementation), computes comparison statistics, and
//! renders them as a terminal summary and a self-contained HTML report
//! with embedded charts.

pub mod config;
pub mod core;
pub mod ingest;
pub mod metrics;
pub mod reporting;
pub mod ui;

// Re-export the most commonly used items at the crate root
pub use crate::core::error::{QbrError, Result};
pub use crate::core::types::{MetricSample, Period};
pub use crate::metrics::{DeltaPercent, MetricComparison, ReportSummary};
