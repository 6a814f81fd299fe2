//! Application-wide constants to avoid magic values throughout the codebase.
//!
//! This module centralizes all magic strings, numbers, and other literal values
//! used across the application, making them easier to maintain and modify.

/// Output format constants
pub mod output_formats {
    /// Text output format - colorized table with KPI lines
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";
    /// Minimal output format - plain rows without colors
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// Measurement period constants
pub mod periods {
    /// CSV token for the baseline window
    pub const PRE: &str = "pre";
    /// CSV token for the measurement window
    pub const POST: &str = "post";
    /// Length of each comparison window in days
    pub const WINDOW_DAYS: u32 = 28;
    /// Default display label for the baseline window
    pub const DEFAULT_PRE_LABEL: &str = "Pre-Implementation";
    /// Default display label for the measurement window
    pub const DEFAULT_POST_LABEL: &str = "Post-Implementation";
}

/// Brand palette used by the HTML report.
///
/// These hex values are a fixed visual contract with the university brand
/// guidelines and must be reproduced exactly.
pub mod palette {
    /// Primary accent (Arizona Red)
    pub const PRIMARY_ACCENT: &str = "#AB0520";
    /// Primary dark (Arizona Blue)
    pub const PRIMARY_DARK: &str = "#0C234B";
    /// Highlight: Sky
    pub const SKY: &str = "#81D3EB";
    /// Highlight: Oasis
    pub const OASIS: &str = "#378DBD";
    /// Highlight: Azurite
    pub const AZURITE: &str = "#1E5288";
    /// Highlight: Leaf (positive movement)
    pub const LEAF: &str = "#70B865";
    /// Highlight: Bloom (negative movement)
    pub const BLOOM: &str = "#EF4056";
    /// Neutral: Cool Gray
    pub const COOL_GRAY: &str = "#E2E9EB";
    /// Neutral: Warm Gray
    pub const WARM_GRAY: &str = "#F4EDE5";
}

/// Default configuration values
pub mod defaults {
    /// Decimal places used when rendering percentages
    pub const PERCENT_PRECISION: usize = 1;
    /// Maximum accepted percentage precision
    pub const MAX_PERCENT_PRECISION: usize = 6;
    /// Number of pages shown in the top-movers chart
    pub const TOP_MOVERS: usize = 10;
    /// Default report title
    pub const REPORT_TITLE: &str = "RFI Conversion Analysis";
    /// Config file name searched in standard locations
    pub const CONFIG_FILE_NAME: &str = ".qbrgen.toml";
    /// How many parent directories are searched for a config file
    pub const CONFIG_SEARCH_DEPTH: usize = 3;
}

/// CSV column names for the supported input formats
pub mod columns {
    /// Long format: metric identifier
    pub const METRIC_NAME: &str = "metric_name";
    /// Long format: period token (pre|post)
    pub const PERIOD: &str = "period";
    /// Long format: numeric sample
    pub const VALUE: &str = "value";

    /// Page format: page path
    pub const PAGE: &str = "page";
    /// Page format: baseline sessions
    pub const SESSIONS_PRE: &str = "sessions_pre";
    /// Page format: measurement sessions
    pub const SESSIONS_POST: &str = "sessions_post";
    /// Page format: baseline conversions
    pub const CONVERSIONS_PRE: &str = "conversions_pre";
    /// Page format: measurement conversions
    pub const CONVERSIONS_POST: &str = "conversions_post";
}

/// Display and formatting constants
pub mod display {
    /// Sentinel rendered when a percentage delta is undefined
    pub const NOT_APPLICABLE: &str = "n/a";
    /// Suffix for percentage-point deltas
    pub const PERCENTAGE_POINT_SUFFIX: &str = "pp";
    /// Success-rate threshold for the "success" tone in the report
    pub const SUCCESS_THRESHOLD: f64 = 60.0;
    /// Success-rate threshold for the "warning" tone in the report
    pub const WARNING_THRESHOLD: f64 = 40.0;
    /// Page-path prefix stripped before charting
    pub const PAGE_PREFIX: &str = "/online-degrees/";
    /// Separator used when flattening page paths for display
    pub const PAGE_SEPARATOR: &str = " › ";
}
