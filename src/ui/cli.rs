// Command-line interface definitions and parsing for qbrgen

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CSV file with metric samples (metric_name,period,value)
    pub metrics: Option<String>,

    // Input
    /// Page-level CSV (page,sessions_pre,sessions_post,conversions_pre,conversions_post)
    #[arg(long, value_name = "FILE", help_heading = "Input")]
    pub pages: Option<String>,

    /// Page path patterns to exclude (regex)
    #[arg(long, value_name = "REGEX", help_heading = "Input")]
    pub exclude_pattern: Vec<String>,

    // Report
    /// Write a self-contained HTML report to this path
    #[arg(short = 'o', long, value_name = "PATH", help_heading = "Report")]
    pub report: Option<String>,

    /// Report title
    #[arg(long, value_name = "TEXT", help_heading = "Report")]
    pub title: Option<String>,

    /// Display label for the baseline window
    #[arg(long, value_name = "TEXT", help_heading = "Report")]
    pub pre_label: Option<String>,

    /// Display label for the measurement window
    #[arg(long, value_name = "TEXT", help_heading = "Report")]
    pub post_label: Option<String>,

    /// Number of pages in the top-movers chart (default: 10)
    #[arg(long, value_name = "COUNT", help_heading = "Report")]
    pub top_movers: Option<usize>,

    // Output & Verbosity
    /// Output format
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Decimal places for percentages (default: 1)
    #[arg(long, value_name = "DIGITS", help_heading = "Output & Verbosity")]
    pub precision: Option<usize>,

    /// Suppress all terminal output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    #[command(name = "completion-generate", arg_required_else_help = true)]
    CompletionGenerate {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Install shell completions to standard location
    #[command(name = "completion-install", arg_required_else_help = true)]
    CompletionInstall {
        /// The shell to install completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Collect CLI arguments into a CliConfig for merging with file config
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        title: cli.title.clone(),
        report_path: cli.report.clone(),
        output_format: cli.format.clone(),
        precision: cli.precision,
        top_movers: cli.top_movers,
        pre_label: cli.pre_label.clone(),
        post_label: cli.post_label.clone(),
        exclude_patterns: if cli.exclude_pattern.is_empty() {
            None
        } else {
            Some(cli.exclude_pattern.clone())
        },
        verbose: cli.verbose,
    }
}
