//! Report generation
//!
//! This module handles HTML report generation and structured logging
//! for the application.

pub mod logging;
pub mod report;

// Re-export commonly used items
pub use report::HtmlReport;
