use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::constants::periods;

/// One of the two fixed 28-day measurement windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Baseline window, before the change under review
    Pre,
    /// Measurement window, after the change under review
    Post,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Pre => write!(f, "{}", periods::PRE),
            Period::Post => write!(f, "{}", periods::POST),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            periods::PRE => Ok(Period::Pre),
            periods::POST => Ok(Period::Post),
            other => Err(format!(
                "unknown period '{other}', expected '{}' or '{}'",
                periods::PRE,
                periods::POST
            )),
        }
    }
}

/// Represents a single measured sample parsed from the metrics CSV.
///
/// This type tracks where the sample was found within the source file,
/// including the exact line number for error reporting purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Metric identifier, e.g. "RFI submissions"
    pub metric_name: String,
    /// Which measurement window the sample belongs to
    pub period: Period,
    /// The measured value
    pub value: f64,
    /// CSV line number where the sample was read (1-indexed, header is line 1)
    pub line: u64,
}

/// Builder for creating `MetricSample` instances with validation.
#[derive(Debug, Default)]
pub struct MetricSampleBuilder {
    metric_name: Option<String>,
    period: Option<Period>,
    value: Option<f64>,
    line: Option<u64>,
}

/// Errors that can occur when building a `MetricSample`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricSampleError {
    /// Metric name is missing or empty
    MissingName,
    /// Period is missing
    MissingPeriod,
    /// Value is missing
    MissingValue,
    /// Value is not a finite number
    NonFiniteValue,
    /// Line number is missing or zero
    InvalidLineNumber,
}

impl fmt::Display for MetricSampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "Metric name is required and cannot be empty"),
            Self::MissingPeriod => write!(f, "Period is required"),
            Self::MissingValue => write!(f, "Value is required"),
            Self::NonFiniteValue => write!(f, "Value must be a finite number"),
            Self::InvalidLineNumber => write!(f, "Line number must be greater than 0"),
        }
    }
}

impl std::error::Error for MetricSampleError {}

impl MetricSample {
    /// Create a new MetricSample with validation.
    ///
    /// # Arguments
    /// * `metric_name` - Metric identifier (must not be empty)
    /// * `period` - Measurement window the sample belongs to
    /// * `value` - Measured value (must be finite)
    /// * `line` - CSV line the sample was read from (must be > 0)
    pub fn new(
        metric_name: String,
        period: Period,
        value: f64,
        line: u64,
    ) -> Result<Self, MetricSampleError> {
        if metric_name.trim().is_empty() {
            return Err(MetricSampleError::MissingName);
        }
        if !value.is_finite() {
            return Err(MetricSampleError::NonFiniteValue);
        }
        if line == 0 {
            return Err(MetricSampleError::InvalidLineNumber);
        }

        Ok(Self {
            metric_name: metric_name.trim().to_string(),
            period,
            value,
            line,
        })
    }

    /// Create a builder for constructing MetricSample instances.
    pub fn builder() -> MetricSampleBuilder {
        MetricSampleBuilder::default()
    }
}

impl MetricSampleBuilder {
    pub fn metric_name<S: Into<String>>(mut self, name: S) -> Self {
        self.metric_name = Some(name.into());
        self
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Build the sample, validating all required fields.
    pub fn build(self) -> Result<MetricSample, MetricSampleError> {
        let metric_name = self.metric_name.ok_or(MetricSampleError::MissingName)?;
        let period = self.period.ok_or(MetricSampleError::MissingPeriod)?;
        let value = self.value.ok_or(MetricSampleError::MissingValue)?;
        let line = self.line.ok_or(MetricSampleError::InvalidLineNumber)?;

        MetricSample::new(metric_name, period, value, line)
    }
}
