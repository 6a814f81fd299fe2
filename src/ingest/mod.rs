//! CSV ingestion
//!
//! Loads the two supported input formats and rejects malformed input
//! before anything is rendered. Every error names the offending
//! 1-indexed line so analysts can fix the export quickly; silently
//! dropping rows would misrepresent results.
//!
//! Long format (one sample per row):
//! `metric_name,period,value` with `period` in `pre|post`.
//!
//! Page format (one page per row):
//! `page,sessions_pre,sessions_post,conversions_pre,conversions_post`.

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use regex::Regex;

use crate::core::constants::columns;
use crate::core::error::{QbrError, Result};
use crate::core::types::{MetricSample, Period};
use crate::metrics::MetricComparison;

/// One row of the wide page-level CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub page: String,
    pub sessions_pre: u64,
    pub sessions_post: u64,
    pub conversions_pre: u64,
    pub conversions_post: u64,
    /// CSV line the record was read from (1-indexed, header is line 1)
    pub line: u64,
}

/// Maps required header names to their column indexes, erroring on any
/// missing column.
fn column_indexes(headers: &csv::StringRecord, required: &[&str], path: &Path) -> Result<Vec<usize>> {
    required
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    QbrError::Data(format!(
                        "{}: missing required column '{name}' in header",
                        path.display()
                    ))
                })
        })
        .collect()
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !path.exists() {
        return Err(QbrError::FileNotFound(path.display().to_string()));
    }
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    Ok(reader)
}

fn field<'a>(
    record: &'a csv::StringRecord,
    idx: usize,
    name: &str,
    line: u64,
    path: &Path,
) -> Result<&'a str> {
    record.get(idx).filter(|s| !s.is_empty()).ok_or_else(|| {
        QbrError::Data(format!(
            "{}: line {line}: missing value for column '{name}'",
            path.display()
        ))
    })
}

fn parse_count(raw: &str, name: &str, line: u64, path: &Path) -> Result<u64> {
    // Counts are non-negative by contract; u64 parsing rejects signs
    raw.parse::<u64>().map_err(|_| {
        QbrError::Data(format!(
            "{}: line {line}: column '{name}' must be a non-negative integer, got '{raw}'",
            path.display()
        ))
    })
}

/// Load the long-format metrics CSV into validated samples.
pub fn load_metric_samples<P: AsRef<Path>>(path: P) -> Result<Vec<MetricSample>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;

    let headers = reader.headers()?.clone();
    let idx = column_indexes(
        &headers,
        &[columns::METRIC_NAME, columns::PERIOD, columns::VALUE],
        path,
    )?;
    let (name_idx, period_idx, value_idx) = (idx[0], idx[1], idx[2]);

    let mut samples = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = (i + 2) as u64;
        let record = result.map_err(|e| {
            QbrError::Data(format!("{}: line {line}: {e}", path.display()))
        })?;

        let name = field(&record, name_idx, columns::METRIC_NAME, line, path)?;
        let period_raw = field(&record, period_idx, columns::PERIOD, line, path)?;
        let value_raw = field(&record, value_idx, columns::VALUE, line, path)?;

        let period: Period = period_raw.parse().map_err(|e| {
            QbrError::Data(format!("{}: line {line}: {e}", path.display()))
        })?;
        let value: f64 = value_raw.parse().map_err(|_| {
            QbrError::Data(format!(
                "{}: line {line}: column '{}' must be numeric, got '{value_raw}'",
                path.display(),
                columns::VALUE
            ))
        })?;
        if value < 0.0 {
            return Err(QbrError::Data(format!(
                "{}: line {line}: metric '{name}' has negative value {value}",
                path.display()
            )));
        }

        let sample = MetricSample::new(name.to_string(), period, value, line)
            .map_err(|e| QbrError::Data(format!("{}: line {line}: {e}", path.display())))?;
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(QbrError::Data(format!(
            "{}: no data rows found",
            path.display()
        )));
    }

    debug!("Read {} sample(s) from {}", samples.len(), path.display());
    Ok(samples)
}

/// Pair pre/post samples into comparison records.
///
/// Output order is the first-appearance order of metric names in the
/// file; that order is the display order downstream. Duplicate samples
/// for a window and metrics missing a counterpart are rejected.
pub fn pair_samples(samples: &[MetricSample]) -> Result<Vec<MetricComparison>> {
    let mut order: Vec<String> = Vec::new();
    let mut pairs: HashMap<String, (Option<&MetricSample>, Option<&MetricSample>)> =
        HashMap::new();

    for sample in samples {
        let entry = pairs.entry(sample.metric_name.clone()).or_insert_with(|| {
            order.push(sample.metric_name.clone());
            (None, None)
        });
        let slot = match sample.period {
            Period::Pre => &mut entry.0,
            Period::Post => &mut entry.1,
        };
        if let Some(existing) = slot {
            return Err(QbrError::Data(format!(
                "line {}: duplicate '{}' row for metric '{}' (first seen on line {})",
                sample.line, sample.period, sample.metric_name, existing.line
            )));
        }
        *slot = Some(sample);
    }

    let mut comparisons = Vec::with_capacity(order.len());
    for name in order {
        let (pre, post) = &pairs[&name];
        match (pre, post) {
            (Some(pre), Some(post)) => {
                comparisons.push(MetricComparison::compute(&name, pre.value, post.value));
            }
            (Some(pre), None) => {
                return Err(QbrError::Data(format!(
                    "metric '{name}' (line {}) has a 'pre' sample but no 'post' sample",
                    pre.line
                )));
            }
            (None, Some(post)) => {
                return Err(QbrError::Data(format!(
                    "metric '{name}' (line {}) has a 'post' sample but no 'pre' sample",
                    post.line
                )));
            }
            (None, None) => unreachable!("metric recorded without any sample"),
        }
    }

    Ok(comparisons)
}

/// Load and pair the long-format metrics CSV in one step.
pub fn load_comparisons<P: AsRef<Path>>(path: P) -> Result<Vec<MetricComparison>> {
    let samples = load_metric_samples(path)?;
    pair_samples(&samples)
}

/// Load the wide page-level CSV, dropping pages matching any exclude
/// pattern.
pub fn load_page_records<P: AsRef<Path>>(
    path: P,
    exclude_patterns: &[Regex],
) -> Result<Vec<PageRecord>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;

    let headers = reader.headers()?.clone();
    let idx = column_indexes(
        &headers,
        &[
            columns::PAGE,
            columns::SESSIONS_PRE,
            columns::SESSIONS_POST,
            columns::CONVERSIONS_PRE,
            columns::CONVERSIONS_POST,
        ],
        path,
    )?;

    let mut records = Vec::new();
    let mut excluded = 0usize;
    for (i, result) in reader.records().enumerate() {
        let line = (i + 2) as u64;
        let record = result.map_err(|e| {
            QbrError::Data(format!("{}: line {line}: {e}", path.display()))
        })?;

        let page = field(&record, idx[0], columns::PAGE, line, path)?.to_string();
        if exclude_patterns.iter().any(|re| re.is_match(&page)) {
            excluded += 1;
            continue;
        }

        let sessions_pre = parse_count(
            field(&record, idx[1], columns::SESSIONS_PRE, line, path)?,
            columns::SESSIONS_PRE,
            line,
            path,
        )?;
        let sessions_post = parse_count(
            field(&record, idx[2], columns::SESSIONS_POST, line, path)?,
            columns::SESSIONS_POST,
            line,
            path,
        )?;
        let conversions_pre = parse_count(
            field(&record, idx[3], columns::CONVERSIONS_PRE, line, path)?,
            columns::CONVERSIONS_PRE,
            line,
            path,
        )?;
        let conversions_post = parse_count(
            field(&record, idx[4], columns::CONVERSIONS_POST, line, path)?,
            columns::CONVERSIONS_POST,
            line,
            path,
        )?;

        if conversions_pre > sessions_pre || conversions_post > sessions_post {
            return Err(QbrError::Data(format!(
                "{}: line {line}: page '{page}' has more conversions than sessions",
                path.display()
            )));
        }

        records.push(PageRecord {
            page,
            sessions_pre,
            sessions_post,
            conversions_pre,
            conversions_post,
            line,
        });
    }

    if records.is_empty() {
        return Err(QbrError::Data(format!(
            "{}: no page rows remain after filtering",
            path.display()
        )));
    }

    debug!(
        "Read {} page record(s) from {} ({excluded} excluded)",
        records.len(),
        path.display()
    );
    Ok(records)
}
