//! Comparison statistics
//!
//! This module is the computational core of the application: pure
//! functions turning pre/post measurement pairs into the deltas,
//! rollups, and chart-ready series displayed by the report. Nothing in
//! here performs I/O; everything is a function of its inputs.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::core::constants::display;
use crate::ingest::PageRecord;

/// A percentage value that may be undefined.
///
/// Division by a zero baseline has no meaningful percentage, so the
/// undefined case is a first-class variant rather than NaN, infinity,
/// or a bare `Option`. Renders as `n/a` and serializes as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaPercent {
    /// A defined percentage
    Value(f64),
    /// Undefined because the denominator was zero
    NotApplicable,
}

impl DeltaPercent {
    /// Percentage change from `pre` to `post`, undefined when `pre == 0`.
    pub fn change(pre: f64, post: f64) -> Self {
        if pre == 0.0 {
            DeltaPercent::NotApplicable
        } else {
            DeltaPercent::Value((post - pre) / pre * 100.0)
        }
    }

    /// `numerator / denominator * 100`, undefined when `denominator == 0`.
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            DeltaPercent::NotApplicable
        } else {
            DeltaPercent::Value(numerator / denominator * 100.0)
        }
    }

    /// The numeric value, if defined.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DeltaPercent::Value(v) => Some(*v),
            DeltaPercent::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, DeltaPercent::Value(_))
    }

    /// Render with a trailing `%` at the given precision, `n/a` when undefined.
    pub fn format(&self, precision: usize) -> String {
        match self {
            DeltaPercent::Value(v) => format!("{v:.precision$}%"),
            DeltaPercent::NotApplicable => display::NOT_APPLICABLE.to_string(),
        }
    }
}

impl Serialize for DeltaPercent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeltaPercent::Value(v) => serializer.serialize_f64(*v),
            DeltaPercent::NotApplicable => serializer.serialize_none(),
        }
    }
}

/// One named KPI compared across the two measurement windows.
///
/// Immutable once computed; the derived deltas are stored alongside the
/// inputs so serialized output carries the full record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric_name: String,
    pub pre_value: f64,
    pub post_value: f64,
    pub delta_absolute: f64,
    pub delta_percent: DeltaPercent,
}

impl MetricComparison {
    /// Compute the comparison record for one metric. Pure; no side effects.
    pub fn compute(metric_name: &str, pre_value: f64, post_value: f64) -> Self {
        Self {
            metric_name: metric_name.to_string(),
            pre_value,
            post_value,
            delta_absolute: post_value - pre_value,
            delta_percent: DeltaPercent::change(pre_value, post_value),
        }
    }

    /// Whether the metric moved in the desired direction.
    pub fn improved(&self) -> bool {
        self.delta_absolute > 0.0
    }
}

/// Chart-ready series: category labels plus parallel pre/post value arrays.
///
/// Order matches the input comparisons exactly; display order is
/// significant and must survive the transformation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub pre: Vec<f64>,
    pub post: Vec<f64>,
}

impl ChartSeries {
    pub fn from_comparisons(comparisons: &[MetricComparison]) -> Self {
        Self {
            labels: comparisons.iter().map(|c| c.metric_name.clone()).collect(),
            pre: comparisons.iter().map(|c| c.pre_value).collect(),
            post: comparisons.iter().map(|c| c.post_value).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Per-page conversion statistics derived from a `PageRecord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageStats {
    pub page: String,
    pub sessions_pre: u64,
    pub sessions_post: u64,
    pub conversions_pre: u64,
    pub conversions_post: u64,
    pub rate_pre: DeltaPercent,
    pub rate_post: DeltaPercent,
    /// Conversion-rate change in percentage points, undefined when either
    /// window had zero sessions.
    pub rate_change_pp: DeltaPercent,
}

impl PageStats {
    pub fn from_record(record: &PageRecord) -> Self {
        let rate_pre =
            DeltaPercent::ratio(record.conversions_pre as f64, record.sessions_pre as f64);
        let rate_post =
            DeltaPercent::ratio(record.conversions_post as f64, record.sessions_post as f64);
        let rate_change_pp = match (rate_pre.as_f64(), rate_post.as_f64()) {
            (Some(pre), Some(post)) => DeltaPercent::Value(post - pre),
            _ => DeltaPercent::NotApplicable,
        };

        Self {
            page: record.page.clone(),
            sessions_pre: record.sessions_pre,
            sessions_post: record.sessions_post,
            conversions_pre: record.conversions_pre,
            conversions_post: record.conversions_post,
            rate_pre,
            rate_post,
            rate_change_pp,
        }
    }

    /// Page path flattened for chart labels, e.g.
    /// `/online-degrees/business/mba` becomes `business › mba`.
    pub fn display_label(&self) -> String {
        let trimmed = self
            .page
            .strip_prefix(display::PAGE_PREFIX)
            .unwrap_or(&self.page);
        trimmed
            .trim_matches('/')
            .split('/')
            .collect::<Vec<_>>()
            .join(display::PAGE_SEPARATOR)
    }
}

/// Win/loss/tie classification of a page's conversion-rate movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Win,
    Loss,
    Tie,
}

impl PageStats {
    pub fn movement(&self) -> Movement {
        match self.rate_change_pp {
            DeltaPercent::Value(v) if v > 0.0 => Movement::Win,
            DeltaPercent::Value(v) if v < 0.0 => Movement::Loss,
            // Zero change and undefined rates both count as ties
            _ => Movement::Tie,
        }
    }
}

/// Aggregate totals across all pages, pre and post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageTotals {
    pub sessions_pre: u64,
    pub sessions_post: u64,
    pub conversions_pre: u64,
    pub conversions_post: u64,
    pub sessions_growth: DeltaPercent,
    pub conversions_growth: DeltaPercent,
    pub rate_pre: DeltaPercent,
    pub rate_post: DeltaPercent,
    pub rate_change_pp: DeltaPercent,
}

/// One entry in the top-movers chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMover {
    pub page: String,
    pub label: String,
    pub rate_change_pp: f64,
}

/// Rollup of the per-page analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAnalysis {
    pub pages: Vec<PageStats>,
    pub totals: PageTotals,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    /// `wins / pages * 100`
    pub success_rate: DeltaPercent,
    pub top_movers: Vec<TopMover>,
    pub best_improvement_pp: DeltaPercent,
    /// Mean of the positive rate changes only
    pub avg_improvement_pp: DeltaPercent,
}

impl PageAnalysis {
    /// Build the full rollup from page records. `top_n` caps the
    /// top-movers list.
    pub fn from_records(records: &[PageRecord], top_n: usize) -> Self {
        let pages: Vec<PageStats> = records.iter().map(PageStats::from_record).collect();

        let sessions_pre: u64 = pages.iter().map(|p| p.sessions_pre).sum();
        let sessions_post: u64 = pages.iter().map(|p| p.sessions_post).sum();
        let conversions_pre: u64 = pages.iter().map(|p| p.conversions_pre).sum();
        let conversions_post: u64 = pages.iter().map(|p| p.conversions_post).sum();

        let rate_pre = DeltaPercent::ratio(conversions_pre as f64, sessions_pre as f64);
        let rate_post = DeltaPercent::ratio(conversions_post as f64, sessions_post as f64);
        let rate_change_pp = match (rate_pre.as_f64(), rate_post.as_f64()) {
            (Some(pre), Some(post)) => DeltaPercent::Value(post - pre),
            _ => DeltaPercent::NotApplicable,
        };

        let totals = PageTotals {
            sessions_pre,
            sessions_post,
            conversions_pre,
            conversions_post,
            sessions_growth: DeltaPercent::change(sessions_pre as f64, sessions_post as f64),
            conversions_growth: DeltaPercent::change(
                conversions_pre as f64,
                conversions_post as f64,
            ),
            rate_pre,
            rate_post,
            rate_change_pp,
        };

        let wins = pages.iter().filter(|p| p.movement() == Movement::Win).count();
        let losses = pages
            .iter()
            .filter(|p| p.movement() == Movement::Loss)
            .count();
        let ties = pages.len() - wins - losses;

        let success_rate = DeltaPercent::ratio(wins as f64, pages.len() as f64);

        let mut movers: Vec<&PageStats> = pages
            .iter()
            .filter(|p| p.rate_change_pp.is_applicable())
            .collect();
        // Descending by rate change, ties broken by page path for
        // deterministic output
        movers.sort_by(|a, b| {
            let av = a.rate_change_pp.as_f64().unwrap_or(0.0);
            let bv = b.rate_change_pp.as_f64().unwrap_or(0.0);
            bv.partial_cmp(&av)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.page.cmp(&b.page))
        });
        let top_movers: Vec<TopMover> = movers
            .iter()
            .take(top_n)
            .map(|p| TopMover {
                page: p.page.clone(),
                label: p.display_label(),
                rate_change_pp: p.rate_change_pp.as_f64().unwrap_or(0.0),
            })
            .collect();

        let positive: Vec<f64> = pages
            .iter()
            .filter_map(|p| p.rate_change_pp.as_f64())
            .filter(|v| *v > 0.0)
            .collect();
        let best_improvement_pp = positive
            .iter()
            .cloned()
            .fold(None::<f64>, |acc, v| Some(acc.map_or(v, |a| a.max(v))))
            .map(DeltaPercent::Value)
            .unwrap_or(DeltaPercent::NotApplicable);
        let avg_improvement_pp = if positive.is_empty() {
            DeltaPercent::NotApplicable
        } else {
            DeltaPercent::Value(positive.iter().sum::<f64>() / positive.len() as f64)
        };

        Self {
            pages,
            totals,
            wins,
            losses,
            ties,
            success_rate,
            top_movers,
            best_improvement_pp,
            avg_improvement_pp,
        }
    }
}

/// Everything the terminal summary and HTML report are rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub title: String,
    pub pre_label: String,
    pub post_label: String,
    pub comparisons: Vec<MetricComparison>,
    pub chart_series: ChartSeries,
    pub page_analysis: Option<PageAnalysis>,
}

impl ReportSummary {
    pub fn new(
        title: String,
        pre_label: String,
        post_label: String,
        comparisons: Vec<MetricComparison>,
        page_analysis: Option<PageAnalysis>,
    ) -> Self {
        let chart_series = ChartSeries::from_comparisons(&comparisons);
        Self {
            title,
            pre_label,
            post_label,
            comparisons,
            chart_series,
            page_analysis,
        }
    }
}

impl Serialize for ReportSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ReportSummary", 6)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("pre_label", &self.pre_label)?;
        state.serialize_field("post_label", &self.post_label)?;
        state.serialize_field("metrics", &self.comparisons)?;
        state.serialize_field("chart_series", &self.chart_series)?;
        state.serialize_field("page_analysis", &self.page_analysis)?;
        state.end()
    }
}
