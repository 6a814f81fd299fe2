//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::constants::{defaults, output_formats, periods};
use crate::core::error::{QbrError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Report title shown in the header
    pub title: Option<String>,

    /// Path the HTML report is written to
    pub report_path: Option<String>,

    /// Terminal output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Decimal places for rendered percentages
    pub precision: Option<usize>,

    /// Number of pages in the top-movers chart
    pub top_movers: Option<usize>,

    /// Display label for the baseline window
    pub pre_label: Option<String>,

    /// Display label for the measurement window
    pub post_label: Option<String>,

    /// Page path patterns to exclude (regex)
    pub exclude_patterns: Option<Vec<String>>,

    /// Enable verbose logging
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: Some(defaults::REPORT_TITLE.to_string()),
            report_path: None, // No HTML report unless requested
            output_format: Some(output_formats::DEFAULT.to_string()),
            precision: Some(defaults::PERCENT_PRECISION),
            top_movers: Some(defaults::TOP_MOVERS),
            pre_label: Some(periods::DEFAULT_PRE_LABEL.to_string()),
            post_label: Some(periods::DEFAULT_POST_LABEL.to_string()),
            exclude_patterns: None,
            verbose: Some(false),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            QbrError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            QbrError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        // Validate the loaded configuration
        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        // Check for .qbrgen.toml in current directory
        if let Ok(config) = Self::load_from_file(defaults::CONFIG_FILE_NAME) {
            return config;
        }

        // Check for .qbrgen.toml in parent directories (up to 3 levels)
        for i in 1..=defaults::CONFIG_SEARCH_DEPTH {
            let path = format!("{}{}", "../".repeat(i), defaults::CONFIG_FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        // Fall back to defaults
        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        if let Some(ref title) = cli_config.title {
            self.title = Some(title.clone());
        }
        if let Some(ref report_path) = cli_config.report_path {
            self.report_path = Some(report_path.clone());
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
        if let Some(precision) = cli_config.precision {
            self.precision = Some(precision);
        }
        if let Some(top_movers) = cli_config.top_movers {
            self.top_movers = Some(top_movers);
        }
        if let Some(ref pre_label) = cli_config.pre_label {
            self.pre_label = Some(pre_label.clone());
        }
        if let Some(ref post_label) = cli_config.post_label {
            self.post_label = Some(post_label.clone());
        }
        if let Some(ref exclude_patterns) = cli_config.exclude_patterns {
            self.exclude_patterns = Some(exclude_patterns.clone());
        }
        if cli_config.verbose {
            self.verbose = Some(true);
        }
    }

    /// Compile exclude patterns into regex objects
    pub fn compile_exclude_patterns(&self) -> Result<Vec<Regex>> {
        let mut compiled = Vec::new();
        if let Some(ref patterns) = self.exclude_patterns {
            for pattern in patterns {
                compiled.push(Regex::new(pattern)?);
            }
        }
        Ok(compiled)
    }

    /// Percentage precision with default applied
    pub fn precision_or_default(&self) -> usize {
        self.precision.unwrap_or(defaults::PERCENT_PRECISION)
    }

    /// Top-movers cap with default applied
    pub fn top_movers_or_default(&self) -> usize {
        self.top_movers.unwrap_or(defaults::TOP_MOVERS)
    }

    /// Report title with default applied
    pub fn title_or_default(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| defaults::REPORT_TITLE.to_string())
    }

    /// Baseline window label with default applied
    pub fn pre_label_or_default(&self) -> String {
        self.pre_label
            .clone()
            .unwrap_or_else(|| periods::DEFAULT_PRE_LABEL.to_string())
    }

    /// Measurement window label with default applied
    pub fn post_label_or_default(&self) -> String {
        self.post_label
            .clone()
            .unwrap_or_else(|| periods::DEFAULT_POST_LABEL.to_string())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(precision) = self.precision {
            if precision > defaults::MAX_PERCENT_PRECISION {
                return Err(QbrError::Config(format!(
                    "Precision of {precision} is too large. Expected 0 to {}.",
                    defaults::MAX_PERCENT_PRECISION
                )));
            }
        }

        if let Some(top_movers) = self.top_movers {
            if top_movers == 0 {
                return Err(QbrError::Config(
                    "top_movers cannot be 0. Expected a positive integer.".to_string(),
                ));
            }
        }

        if let Some(ref format) = self.output_format {
            if !output_formats::ALL.contains(&format.as_str()) {
                return Err(QbrError::Config(format!(
                    "Unknown output format '{format}'. Expected one of: {}.",
                    output_formats::ALL.join(", ")
                )));
            }
        }

        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                return Err(QbrError::Config(
                    "Title cannot be empty.".to_string(),
                ));
            }
        }

        // Surface bad patterns at load time, not mid-run
        self.compile_exclude_patterns()?;

        Ok(())
    }
}

/// Configuration values collected from the command line, prior to
/// merging with file configuration.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub title: Option<String>,
    pub report_path: Option<String>,
    pub output_format: Option<String>,
    pub precision: Option<usize>,
    pub top_movers: Option<usize>,
    pub pre_label: Option<String>,
    pub post_label: Option<String>,
    pub exclude_patterns: Option<Vec<String>>,
    pub verbose: bool,
}
