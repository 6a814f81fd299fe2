use crate::config::Config;
use log::{debug, error, info, warn};
use std::path::Path;

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off // Only show structured logs in verbose mode
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    let precision = config.precision_or_default();
    let top_movers = config.top_movers_or_default();
    let format = config.output_format.as_deref().unwrap_or("text");

    info!("Configuration: format={format}, precision={precision}, top_movers={top_movers}");
    if let Some(ref patterns) = config.exclude_patterns {
        info!("Exclude patterns: {}", patterns.len());
        for pattern in patterns {
            debug!("  exclude: {pattern}");
        }
    }
}

/// Log ingestion information
pub fn log_ingest_info<P: AsRef<Path>>(path: P, metric_count: usize) {
    info!(
        "Loaded {metric_count} metric comparison(s) from {}",
        path.as_ref().display()
    );
}

/// Log page-analysis information
pub fn log_page_info<P: AsRef<Path>>(path: P, pages: usize, wins: usize, losses: usize) {
    if losses > wins {
        warn!(
            "Page analysis from {}: {pages} pages, {wins} improved, {losses} declined",
            path.as_ref().display()
        );
    } else {
        info!(
            "Page analysis from {}: {pages} pages, {wins} improved, {losses} declined",
            path.as_ref().display()
        );
    }
}

/// Log report generation
pub fn log_report_written<P: AsRef<Path>>(path: P, bytes: usize) {
    info!(
        "HTML report written to {} ({bytes} bytes)",
        path.as_ref().display()
    );
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}
