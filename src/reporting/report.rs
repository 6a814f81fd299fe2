//! Self-contained HTML report generation
//!
//! The report is a single document: inline CSS in the brand palette,
//! chart data serialized inline as JSON, and Chart.js loaded from its
//! CDN. Every chart has a plain-table fallback so the numbers stay
//! accessible without JavaScript.

use std::fs;

use crate::core::constants::{display, palette, periods};
use crate::core::error::Result;
use crate::metrics::ReportSummary;
use crate::ui::output::{
    format_count, format_signed_percent, format_signed_pp, format_value, table_rows,
};

/// Constants for report styling and layout
mod report_constants {
    /// Chart.js CDN URL for rendering charts
    pub const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

    /// Canvas element ids
    pub const METRICS_CHART_ID: &str = "metricsChart";
    pub const MOVEMENT_CHART_ID: &str = "movementChart";
    pub const TOP_MOVERS_CHART_ID: &str = "topMoversChart";
}

/// HTML report generator for conversion-review summaries
pub struct HtmlReport;

impl HtmlReport {
    /// Generate and write the HTML report, returning the byte count written.
    pub fn generate_report(
        summary: &ReportSummary,
        precision: usize,
        output_path: &str,
    ) -> Result<usize> {
        let timestamp = chrono::Local::now().format("%B %e, %Y %H:%M").to_string();
        let html_content = Self::generate_html_content(summary, precision, &timestamp)?;
        let bytes = html_content.len();
        fs::write(output_path, html_content)?;
        Ok(bytes)
    }

    /// Generate the complete HTML document content
    fn generate_html_content(
        summary: &ReportSummary,
        precision: usize,
        timestamp: &str,
    ) -> Result<String> {
        let css_styles = Self::generate_css();
        let js_scripts = Self::generate_javascript();
        let body_content = Self::generate_body_content(summary, precision, timestamp)?;

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - qbrgen</title>
    <script src="{}"></script>
    <style>{}</style>
</head>
<body>
    {}
    <script>{}</script>
</body>
</html>"#,
            escape(&summary.title),
            report_constants::CHART_JS_CDN,
            css_styles,
            body_content,
            js_scripts
        ))
    }

    fn generate_css() -> String {
        format!(
            r#"
        :root {{
            --accent-color: {accent};
            --dark-color: {dark};
            --sky-color: {sky};
            --oasis-color: {oasis};
            --azurite-color: {azurite};
            --win-color: {leaf};
            --loss-color: {bloom};
            --bg-color: {warm_gray};
            --neutral-color: {cool_gray};
            --card-bg: #ffffff;
            --text-primary: {dark};
            --text-secondary: #5b6770;
        }}

        * {{ margin: 0; padding: 0; box-sizing: border-box; }}

        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: var(--bg-color);
            color: var(--text-primary);
            line-height: 1.6;
        }}

        .container {{
            max-width: 1100px;
            margin: 0 auto;
            padding: 2rem;
        }}

        .header {{
            text-align: center;
            margin-bottom: 3rem;
            padding: 2rem;
            background: linear-gradient(135deg, var(--dark-color), var(--azurite-color));
            color: white;
            border-radius: 12px;
            border-bottom: 6px solid var(--accent-color);
        }}

        .header h1 {{
            font-size: 2.25rem;
            margin-bottom: 0.5rem;
            font-weight: 700;
        }}

        .header p {{
            font-size: 1.05rem;
            opacity: 0.9;
        }}

        .stats-grid {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
            gap: 1.5rem;
            margin-bottom: 3rem;
        }}

        .stat-card {{
            background: var(--card-bg);
            padding: 1.5rem;
            border-radius: 12px;
            border: 1px solid var(--neutral-color);
            border-top: 4px solid var(--accent-color);
        }}

        .stat-value {{
            font-size: 1.9rem;
            font-weight: 700;
            margin-bottom: 0.4rem;
        }}

        .stat-delta {{
            font-size: 0.95rem;
            font-weight: 600;
        }}

        .stat-label {{
            color: var(--text-secondary);
            font-size: 0.85rem;
            text-transform: uppercase;
            letter-spacing: 0.5px;
        }}

        .up {{ color: var(--win-color); }}
        .down {{ color: var(--loss-color); }}
        .flat {{ color: var(--text-secondary); }}

        .chart-container {{
            background: var(--card-bg);
            padding: 2rem;
            border-radius: 12px;
            border: 1px solid var(--neutral-color);
            margin-bottom: 2rem;
        }}

        .chart-title {{
            font-size: 1.2rem;
            font-weight: 600;
            margin-bottom: 1rem;
        }}

        table {{
            width: 100%;
            border-collapse: collapse;
            margin-top: 1rem;
        }}

        th, td {{
            text-align: left;
            padding: 0.5rem 0.75rem;
            border-bottom: 1px solid var(--neutral-color);
            font-size: 0.95rem;
        }}

        th {{
            background: var(--bg-color);
            text-transform: uppercase;
            font-size: 0.8rem;
            letter-spacing: 0.4px;
            color: var(--text-secondary);
        }}

        td.num {{ text-align: right; font-variant-numeric: tabular-nums; }}

        .footer {{
            text-align: center;
            color: var(--text-secondary);
            font-size: 0.85rem;
            margin-top: 2rem;
        }}

        @media (max-width: 768px) {{
            .container {{ padding: 1rem; }}
            .header h1 {{ font-size: 1.6rem; }}
            .stats-grid {{ grid-template-columns: 1fr; }}
            .chart-container {{ padding: 1rem; }}
        }}
        "#,
            accent = palette::PRIMARY_ACCENT,
            dark = palette::PRIMARY_DARK,
            sky = palette::SKY,
            oasis = palette::OASIS,
            azurite = palette::AZURITE,
            leaf = palette::LEAF,
            bloom = palette::BLOOM,
            warm_gray = palette::WARM_GRAY,
            cool_gray = palette::COOL_GRAY,
        )
    }

    /// Generate the main body content of the report
    fn generate_body_content(
        summary: &ReportSummary,
        precision: usize,
        timestamp: &str,
    ) -> Result<String> {
        let header_section = Self::generate_header_section(summary, timestamp);
        let stats_section = Self::generate_stats_section(summary, precision);
        let metrics_section = Self::generate_metrics_section(summary, precision)?;
        let page_section = Self::generate_page_section(summary, precision);

        Ok(format!(
            r#"
            <div class="container">
                {}
                {}
                {}
                {}
                <div class="footer">Generated by qbrgen</div>
            </div>
            "#,
            header_section, stats_section, metrics_section, page_section
        ))
    }

    /// Generate the report header section
    fn generate_header_section(summary: &ReportSummary, timestamp: &str) -> String {
        format!(
            r#"
            <div class="header">
                <h1>{}</h1>
                <p>{} vs {} &middot; two {}-day windows &middot; generated {}</p>
            </div>
            "#,
            escape(&summary.title),
            escape(&summary.pre_label),
            escape(&summary.post_label),
            periods::WINDOW_DAYS,
            escape(timestamp)
        )
    }

    /// Generate the KPI cards section
    fn generate_stats_section(summary: &ReportSummary, precision: usize) -> String {
        let mut cards = String::new();

        if let Some(analysis) = &summary.page_analysis {
            let totals = &analysis.totals;
            cards.push_str(&Self::generate_stat_card(
                &format_count(totals.sessions_post),
                &format_signed_percent(&totals.sessions_growth, precision),
                "Sessions",
            ));
            cards.push_str(&Self::generate_stat_card(
                &format_count(totals.conversions_post),
                &format_signed_percent(&totals.conversions_growth, precision),
                "RFI Submissions",
            ));
            cards.push_str(&Self::generate_stat_card(
                &totals.rate_post.format(precision),
                &format_signed_pp(&totals.rate_change_pp, precision),
                "Conversion Rate",
            ));
            let success_style = Self::success_rate_style(analysis.success_rate.as_f64());
            cards.push_str(&format!(
                r#"
                <div class="stat-card">
                    <div class="stat-value {}">{}</div>
                    <div class="stat-delta">{} of {} pages improved</div>
                    <div class="stat-label">Success Rate</div>
                </div>
                "#,
                success_style,
                analysis.success_rate.format(precision),
                analysis.wins,
                analysis.pages.len()
            ));
        } else {
            // Without page data the cards come from the metric table itself
            for comparison in summary.comparisons.iter().take(4) {
                cards.push_str(&Self::generate_stat_card(
                    &format_value(comparison.post_value, precision),
                    &format_signed_percent(&comparison.delta_percent, precision),
                    &comparison.metric_name,
                ));
            }
        }

        format!(r#"<div class="stats-grid">{cards}</div>"#)
    }

    /// Generate a single KPI card
    fn generate_stat_card(value: &str, delta: &str, label: &str) -> String {
        let tone = if delta.starts_with('+') {
            "up"
        } else if delta.starts_with('-') {
            "down"
        } else {
            "flat"
        };
        format!(
            r#"
            <div class="stat-card">
                <div class="stat-value">{}</div>
                <div class="stat-delta {}">{}</div>
                <div class="stat-label">{}</div>
            </div>
            "#,
            escape(value),
            tone,
            escape(delta),
            escape(label)
        )
    }

    /// CSS class for the success-rate card based on thresholds
    fn success_rate_style(success_rate: Option<f64>) -> &'static str {
        match success_rate {
            Some(rate) if rate >= display::SUCCESS_THRESHOLD => "up",
            Some(rate) if rate >= display::WARNING_THRESHOLD => "flat",
            Some(_) => "down",
            None => "flat",
        }
    }

    /// Grouped pre/post bar chart plus the accessibility fallback table
    fn generate_metrics_section(summary: &ReportSummary, precision: usize) -> Result<String> {
        let chart_data = serde_json::json!({
            "pre_label": summary.pre_label,
            "post_label": summary.post_label,
            "series": summary.chart_series,
            "movement": summary.page_analysis.as_ref().map(|a| {
                serde_json::json!({ "wins": a.wins, "losses": a.losses, "ties": a.ties })
            }),
            "top_movers": summary.page_analysis.as_ref().map(|a| &a.top_movers),
            "palette": {
                "dark": palette::PRIMARY_DARK,
                "accent": palette::PRIMARY_ACCENT,
                "oasis": palette::OASIS,
                "win": palette::LEAF,
                "loss": palette::BLOOM,
                "neutral": palette::COOL_GRAY,
            },
        });
        let chart_data_json = serde_json::to_string(&chart_data)?;

        let rows = table_rows(&summary.comparisons, precision)
            .iter()
            .map(|row| {
                format!(
                    r#"<tr><td>{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                    escape(&row[0]),
                    escape(&row[1]),
                    escape(&row[2]),
                    escape(&row[3]),
                    escape(&row[4]),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            r#"
            <div class="chart-container">
                <h3 class="chart-title">Key Metrics: {} vs {}</h3>
                <canvas id="{}" width="400" height="200"></canvas>
                <table>
                    <thead>
                        <tr><th>Metric</th><th>{}</th><th>{}</th><th>Delta</th><th>Delta %</th></tr>
                    </thead>
                    <tbody>
                        {}
                    </tbody>
                </table>
            </div>

            <script>
                window.qbrData = {};
            </script>
            "#,
            escape(&summary.pre_label),
            escape(&summary.post_label),
            report_constants::METRICS_CHART_ID,
            escape(&summary.pre_label),
            escape(&summary.post_label),
            rows,
            chart_data_json
        ))
    }

    /// Page-performance charts and detail table, empty when no page data
    fn generate_page_section(summary: &ReportSummary, precision: usize) -> String {
        let Some(analysis) = &summary.page_analysis else {
            return String::new();
        };

        let page_rows = analysis
            .pages
            .iter()
            .map(|p| {
                format!(
                    r#"<tr><td>{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                    escape(&p.page),
                    format_count(p.sessions_pre),
                    format_count(p.sessions_post),
                    p.rate_pre.format(precision),
                    p.rate_post.format(precision),
                    format_signed_pp(&p.rate_change_pp, precision),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"
            <div class="chart-container">
                <h3 class="chart-title">Page Performance: Wins vs Losses</h3>
                <canvas id="{}" width="400" height="180"></canvas>
            </div>

            <div class="chart-container">
                <h3 class="chart-title">Top {} Pages by Conversion Rate Improvement</h3>
                <canvas id="{}" width="400" height="240"></canvas>
            </div>

            <div class="chart-container">
                <h3 class="chart-title">Page Detail ({} pages)</h3>
                <table>
                    <thead>
                        <tr><th>Page</th><th>Sessions (pre)</th><th>Sessions (post)</th><th>Rate (pre)</th><th>Rate (post)</th><th>Change</th></tr>
                    </thead>
                    <tbody>
                        {}
                    </tbody>
                </table>
            </div>
            "#,
            report_constants::MOVEMENT_CHART_ID,
            analysis.top_movers.len(),
            report_constants::TOP_MOVERS_CHART_ID,
            analysis.pages.len(),
            page_rows
        )
    }

    fn generate_javascript() -> &'static str {
        r#"
        document.addEventListener('DOMContentLoaded', function() {
            if (typeof Chart === 'undefined' || !window.qbrData) { return; }
            const data = window.qbrData;
            const palette = data.palette;

            const metricsCtx = document.getElementById('metricsChart');
            if (metricsCtx && data.series.labels.length > 0) {
                new Chart(metricsCtx, {
                    type: 'bar',
                    data: {
                        labels: data.series.labels,
                        datasets: [
                            {
                                label: data.pre_label,
                                data: data.series.pre,
                                backgroundColor: palette.dark
                            },
                            {
                                label: data.post_label,
                                data: data.series.post,
                                backgroundColor: palette.oasis
                            }
                        ]
                    },
                    options: {
                        responsive: true,
                        plugins: {
                            legend: { position: 'bottom', labels: { padding: 20 } }
                        }
                    }
                });
            }

            const movementCtx = document.getElementById('movementChart');
            if (movementCtx && data.movement) {
                new Chart(movementCtx, {
                    type: 'doughnut',
                    data: {
                        labels: ['Improved', 'Declined', 'Unchanged'],
                        datasets: [{
                            data: [data.movement.wins, data.movement.losses, data.movement.ties],
                            backgroundColor: [palette.win, palette.loss, palette.neutral],
                            borderWidth: 2,
                            borderColor: '#ffffff'
                        }]
                    },
                    options: {
                        responsive: true,
                        plugins: { legend: { position: 'bottom' } }
                    }
                });
            }

            const topMoversCtx = document.getElementById('topMoversChart');
            if (topMoversCtx && data.top_movers && data.top_movers.length > 0) {
                new Chart(topMoversCtx, {
                    type: 'bar',
                    data: {
                        labels: data.top_movers.map(m => m.label),
                        datasets: [{
                            label: 'Conversion rate change (pp)',
                            data: data.top_movers.map(m => m.rate_change_pp),
                            backgroundColor: data.top_movers.map(
                                m => m.rate_change_pp >= 0 ? palette.win : palette.loss
                            )
                        }]
                    },
                    options: {
                        indexAxis: 'y',
                        responsive: true,
                        plugins: { legend: { display: false } }
                    }
                });
            }
        });
        "#
    }
}

/// Minimal HTML escaping for text interpolated into the document
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::ingest::PageRecord;
    use crate::metrics::{MetricComparison, PageAnalysis};
    use tempfile::NamedTempFile;

    fn sample_summary(with_pages: bool) -> ReportSummary {
        let page_analysis = with_pages.then(|| {
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
            PageAnalysis::from_records(&records, 10)
        });

        ReportSummary::new(
            "UAGC RFI Conversion Analysis".to_string(),
            "Pre-Implementation".to_string(),
            "Post-Implementation".to_string(),
            vec![
                MetricComparison::compute("RFI submissions", 516.0, 659.0),
                MetricComparison::compute("conversion rate", 1.62, 1.94),
            ],
            page_analysis,
        )
    }

    #[test]
    fn test_generate_report_writes_file() {
        let summary = sample_summary(true);
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let bytes = HtmlReport::generate_report(&summary, 1, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(bytes, content.len());
        assert!(content.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_html_contains_chartjs_and_data() {
        let summary = sample_summary(true);
        let html = HtmlReport::generate_html_content(&summary, 1, "August 29, 2026 10:00").unwrap();

        assert!(html.contains(report_constants::CHART_JS_CDN));
        assert!(html.contains("window.qbrData"));
        assert!(html.contains("metricsChart"));
        assert!(html.contains("movementChart"));
        assert!(html.contains("topMoversChart"));
    }

    #[test]
    fn test_html_contains_brand_palette() {
        let summary = sample_summary(false);
        let html = HtmlReport::generate_html_content(&summary, 1, "now").unwrap();

        assert!(html.contains("#AB0520"));
        assert!(html.contains("#0C234B"));
    }

    #[test]
    fn test_html_fallback_table_preserves_order_and_values() {
        let summary = sample_summary(false);
        let html = HtmlReport::generate_html_content(&summary, 1, "now").unwrap();

        let first = html.find("RFI submissions").unwrap();
        let second = html.find("conversion rate").unwrap();
        assert!(first < second, "table rows must keep input order");
        assert!(html.contains("+143"));
        assert!(html.contains("+27.7%"));
    }

    #[test]
    fn test_html_without_page_data_has_no_page_sections() {
        let summary = sample_summary(false);
        let html = HtmlReport::generate_html_content(&summary, 1, "now").unwrap();

        assert!(!html.contains(r#"id="movementChart""#));
        assert!(!html.contains("Page Detail"));
        // Metric cards fall back to the comparisons themselves
        assert!(!html.contains("Success Rate"));
    }

    #[test]
    fn test_html_with_page_data_has_kpi_cards() {
        let summary = sample_summary(true);
        let html = HtmlReport::generate_html_content(&summary, 1, "now").unwrap();

        assert!(html.contains("Success Rate"));
        assert!(html.contains("2,180")); // post sessions total
        assert!(html.contains("Page Detail (2 pages)"));
    }

    #[test]
    fn test_success_rate_style_thresholds() {
        assert_eq!(HtmlReport::success_rate_style(Some(75.0)), "up");
        assert_eq!(HtmlReport::success_rate_style(Some(50.0)), "flat");
        assert_eq!(HtmlReport::success_rate_style(Some(10.0)), "down");
        assert_eq!(HtmlReport::success_rate_style(None), "flat");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_escape_applied_to_metric_names() {
        let summary = ReportSummary::new(
            "t".to_string(),
            "Pre".to_string(),
            "Post".to_string(),
            vec![MetricComparison::compute("<script>", 1.0, 2.0)],
            None,
        );
        let html = HtmlReport::generate_html_content(&summary, 1, "now").unwrap();
        assert!(html.contains("&lt;script&gt;"));
    }
}
