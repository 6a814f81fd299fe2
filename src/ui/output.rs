//! Terminal rendering of the report summary
//!
//! Three formats mirror the config's `output_format`: `text` (colorized
//! table plus KPI lines), `minimal` (the same content, plain), and
//! `json` (the serialized summary for automation).

use crate::core::constants::{display, output_formats, periods};
use crate::core::error::{QbrError, Result};
use crate::metrics::{DeltaPercent, MetricComparison, ReportSummary};
use crate::ui::color::{Colors, colorize};

/// Format a count with thousands separators, e.g. `43210` -> `43,210`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a metric value: integral values render as grouped integers,
/// fractional values at the given precision.
pub fn format_value(value: f64, precision: usize) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 && value >= 0.0 {
        format_count(value as u64)
    } else {
        format!("{value:.precision$}")
    }
}

/// Format an absolute delta with an explicit sign.
pub fn format_signed_value(value: f64, precision: usize) -> String {
    let sign = if value >= 0.0 { "+" } else { "-" };
    format!("{sign}{}", format_value(value.abs(), precision))
}

/// Format a percentage delta with an explicit sign, `n/a` when undefined.
pub fn format_signed_percent(delta: &DeltaPercent, precision: usize) -> String {
    match delta.as_f64() {
        Some(v) => {
            let sign = if v >= 0.0 { "+" } else { "-" };
            format!("{sign}{:.precision$}%", v.abs())
        }
        None => display::NOT_APPLICABLE.to_string(),
    }
}

/// Format a percentage-point delta with an explicit sign and `pp` suffix.
pub fn format_signed_pp(delta: &DeltaPercent, precision: usize) -> String {
    match delta.as_f64() {
        Some(v) => {
            let sign = if v >= 0.0 { "+" } else { "-" };
            format!(
                "{sign}{:.precision$}{}",
                v.abs(),
                display::PERCENTAGE_POINT_SUFFIX
            )
        }
        None => display::NOT_APPLICABLE.to_string(),
    }
}

/// One formatted table row per metric, in input order.
pub fn table_rows(comparisons: &[MetricComparison], precision: usize) -> Vec<[String; 5]> {
    comparisons
        .iter()
        .map(|c| {
            [
                c.metric_name.clone(),
                format_value(c.pre_value, precision),
                format_value(c.post_value, precision),
                format_signed_value(c.delta_absolute, precision),
                format_signed_percent(&c.delta_percent, precision),
            ]
        })
        .collect()
}

/// Render the summary in the requested output format.
pub fn render(summary: &ReportSummary, format: &str, precision: usize) -> Result<String> {
    match format {
        output_formats::TEXT => Ok(render_table(summary, precision, true)),
        output_formats::MINIMAL => Ok(render_table(summary, precision, false)),
        output_formats::JSON => Ok(serde_json::to_string_pretty(summary)?),
        other => Err(QbrError::InvalidArgument(format!(
            "Unknown output format '{other}'"
        ))),
    }
}

fn tone_for(value: f64, colored: bool) -> &'static str {
    if !colored {
        ""
    } else if value > 0.0 {
        Colors::BRIGHT_GREEN
    } else if value < 0.0 {
        Colors::BRIGHT_RED
    } else {
        Colors::DIM
    }
}

fn paint(text: &str, color: &str, colored: bool) -> String {
    if colored && !color.is_empty() {
        colorize(text, color)
    } else {
        text.to_string()
    }
}

fn render_table(summary: &ReportSummary, precision: usize, colored: bool) -> String {
    let headers = ["Metric", "Pre", "Post", "Delta", "Delta %"];
    let rows = table_rows(&summary.comparisons, precision);

    // Column widths fit the widest cell incl. header
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    out.push_str(&paint(
        &summary.title,
        &format!("{}{}", Colors::BOLD, Colors::BRIGHT_CYAN),
        colored,
    ));
    out.push('\n');
    out.push_str(&format!(
        "{} vs {} ({}-day windows)\n\n",
        summary.pre_label,
        summary.post_label,
        periods::WINDOW_DAYS
    ));

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{h:<width$}", width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&paint(&header_line, Colors::BOLD, colored));
    out.push('\n');

    for (row, comparison) in rows.iter().zip(&summary.comparisons) {
        let tone = tone_for(comparison.delta_absolute, colored);
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let padded = format!("{cell:<width$}", width = widths[i]);
                if i >= 3 {
                    paint(&padded, tone, colored)
                } else {
                    padded
                }
            })
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }

    if let Some(analysis) = &summary.page_analysis {
        out.push('\n');
        out.push_str(&paint("Page performance", Colors::BOLD, colored));
        out.push('\n');
        out.push_str(&format!(
            "  Pages analyzed: {} ({} improved, {} declined, {} unchanged)\n",
            format_count(analysis.pages.len() as u64),
            analysis.wins,
            analysis.losses,
            analysis.ties
        ));
        out.push_str(&format!(
            "  Success rate: {}\n",
            analysis.success_rate.format(precision)
        ));
        out.push_str(&format!(
            "  Sessions: {} -> {} ({})\n",
            format_count(analysis.totals.sessions_pre),
            format_count(analysis.totals.sessions_post),
            format_signed_percent(&analysis.totals.sessions_growth, precision)
        ));
        out.push_str(&format!(
            "  Submissions: {} -> {} ({})\n",
            format_count(analysis.totals.conversions_pre),
            format_count(analysis.totals.conversions_post),
            format_signed_percent(&analysis.totals.conversions_growth, precision)
        ));
        out.push_str(&format!(
            "  Conversion rate: {} -> {} ({})\n",
            analysis.totals.rate_pre.format(precision),
            analysis.totals.rate_post.format(precision),
            format_signed_pp(&analysis.totals.rate_change_pp, precision)
        ));

        if !analysis.top_movers.is_empty() {
            out.push('\n');
            out.push_str(&paint("Top movers", Colors::BOLD, colored));
            out.push('\n');
            for (i, mover) in analysis.top_movers.iter().enumerate() {
                let delta = format_signed_pp(&DeltaPercent::Value(mover.rate_change_pp), precision);
                let tone = tone_for(mover.rate_change_pp, colored);
                out.push_str(&format!(
                    "{:4}. {} {}\n",
                    i + 1,
                    mover.label,
                    paint(&delta, tone, colored)
                ));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::ingest::PageRecord;
    use crate::metrics::PageAnalysis;

    fn summary_with_pages() -> ReportSummary {
        let records = vec![
            PageRecord {
                page: "/online-degrees/business/mba".to_string(),
                sessions_pre: 1200,
                sessions_post: 1400,
                conversions_pre: 24,
                conversions_post: 35,
                line: 2,
            },
            PageRecord {
                page: "/online-degrees/health".to_string(),
                sessions_pre: 800,
                sessions_post: 780,
                conversions_pre: 10,
                conversions_post: 9,
                line: 3,
            },
        ];
        ReportSummary::new(
            "Q3 QBR".to_string(),
            "Pre-Implementation".to_string(),
            "Post-Implementation".to_string(),
            vec![
                MetricComparison::compute("RFI submissions", 516.0, 659.0),
                MetricComparison::compute("conversion rate", 1.62, 1.94),
            ],
            Some(PageAnalysis::from_records(&records, 10)),
        )
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(43210), "43,210");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(516.0, 1), "516");
        assert_eq!(format_value(43210.0, 1), "43,210");
        assert_eq!(format_value(1.62, 1), "1.6");
        assert_eq!(format_value(1.62, 2), "1.62");
    }

    #[test]
    fn test_format_signed_value() {
        assert_eq!(format_signed_value(143.0, 1), "+143");
        assert_eq!(format_signed_value(-27.0, 1), "-27");
        assert_eq!(format_signed_value(0.32, 2), "+0.32");
    }

    #[test]
    fn test_format_signed_percent() {
        assert_eq!(
            format_signed_percent(&DeltaPercent::Value(27.713178), 1),
            "+27.7%"
        );
        assert_eq!(
            format_signed_percent(&DeltaPercent::Value(-3.25), 2),
            "-3.25%"
        );
        assert_eq!(format_signed_percent(&DeltaPercent::NotApplicable, 1), "n/a");
    }

    #[test]
    fn test_format_signed_percent__round_trip_within_precision() {
        let original = 27.713178;
        let formatted = format_signed_percent(&DeltaPercent::Value(original), 2);
        let parsed: f64 = formatted
            .trim_start_matches('+')
            .trim_end_matches('%')
            .parse()
            .unwrap();
        assert!((parsed - original).abs() < 0.005);
    }

    #[test]
    fn test_format_signed_pp() {
        assert_eq!(format_signed_pp(&DeltaPercent::Value(0.32), 2), "+0.32pp");
        assert_eq!(format_signed_pp(&DeltaPercent::Value(-1.5), 1), "-1.5pp");
        assert_eq!(format_signed_pp(&DeltaPercent::NotApplicable, 1), "n/a");
    }

    #[test]
    fn test_table_rows_preserve_order() {
        let comparisons = vec![
            MetricComparison::compute("z-metric", 1.0, 2.0),
            MetricComparison::compute("a-metric", 3.0, 4.0),
        ];
        let rows = table_rows(&comparisons, 1);
        assert_eq!(rows[0][0], "z-metric");
        assert_eq!(rows[1][0], "a-metric");
    }

    #[test]
    fn test_render_text_contains_metrics_and_kpis() {
        let summary = summary_with_pages();
        let out = render(&summary, "text", 1).unwrap();

        assert!(out.contains("Q3 QBR"));
        assert!(out.contains("RFI submissions"));
        assert!(out.contains("+143"));
        assert!(out.contains("+27.7%"));
        assert!(out.contains("Success rate: 50.0%"));
        assert!(out.contains("Sessions: 2,000 -> 2,180"));
        assert!(out.contains("Top movers"));
        assert!(out.contains("business › mba"));
    }

    #[test]
    fn test_render_minimal_has_no_escape_codes() {
        let summary = summary_with_pages();
        let out = render(&summary, "minimal", 1).unwrap();
        assert!(!out.contains('\x1b'));
        assert!(out.contains("RFI submissions"));
    }

    #[test]
    fn test_render_json_is_valid() {
        let summary = summary_with_pages();
        let out = render(&summary, "json", 1).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["metrics"][0]["metric_name"], "RFI submissions");
        assert_eq!(value["page_analysis"]["wins"], 1);
    }

    #[test]
    fn test_render__unknown_format_errors() {
        let summary = summary_with_pages();
        assert!(render(&summary, "yaml", 1).is_err());
    }

    #[test]
    fn test_render__zero_baseline_shows_sentinel() {
        let summary = ReportSummary::new(
            "t".to_string(),
            "Pre".to_string(),
            "Post".to_string(),
            vec![MetricComparison::compute("new metric", 0.0, 5.0)],
            None,
        );
        let out = render(&summary, "minimal", 1).unwrap();
        assert!(out.contains("n/a"));
        assert!(out.contains("+5"));
    }
}
