//! Property-based tests for qbrgen using proptest
//!
//! These tests generate random inputs to test edge cases and ensure
//! robustness across a wide range of potential inputs.

use proptest::prelude::*;

use qbrgen::metrics::{ChartSeries, DeltaPercent, MetricComparison};
use qbrgen::ui::output::{format_count, format_signed_percent, table_rows};

/// Generate plausible metric values (counts and small rates)
fn value_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        // Count-like values
        (0u32..1_000_000u32).prop_map(|v| v as f64),
        // Rate-like values
        (0.0f64..100.0f64),
        // Edge cases
        Just(0.0),
        Just(0.001),
        Just(999_999.0),
    ]
}

/// Generate metric names like the ones found in analytics exports
fn metric_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 _-]{0,30}".prop_map(|s| s.trim().to_string())
}

proptest! {
    #[test]
    fn prop_delta_percent_matches_definition(
        pre in 0.000001f64..1_000_000.0,
        post in value_strategy(),
    ) {
        let delta = DeltaPercent::change(pre, post);
        let expected = (post - pre) / pre * 100.0;
        match delta {
            DeltaPercent::Value(v) => {
                prop_assert!((v - expected).abs() <= expected.abs() * 1e-12 + 1e-12);
            }
            DeltaPercent::NotApplicable => prop_assert!(false, "pre > 0 must yield a value"),
        }
    }

    #[test]
    fn prop_zero_baseline_is_always_not_applicable(post in value_strategy()) {
        let delta = DeltaPercent::change(0.0, post);
        prop_assert_eq!(delta, DeltaPercent::NotApplicable);
        prop_assert!(delta.as_f64().is_none());
    }

    #[test]
    fn prop_delta_absolute_is_exact_difference(
        pre in value_strategy(),
        post in value_strategy(),
    ) {
        let comparison = MetricComparison::compute("m", pre, post);
        prop_assert_eq!(comparison.delta_absolute, post - pre);
    }

    #[test]
    fn prop_formatted_percent_parses_back_within_precision(
        value in -10_000.0f64..10_000.0,
        precision in 0usize..=6,
    ) {
        let formatted = format_signed_percent(&DeltaPercent::Value(value), precision);
        let parsed: f64 = formatted
            .trim_start_matches('+')
            .trim_end_matches('%')
            .parse()
            .unwrap();
        // Round-trip error is bounded by half a unit in the last place
        let tolerance = 0.5 * 10f64.powi(-(precision as i32)) + 1e-9;
        prop_assert!(
            (parsed - value).abs() <= tolerance,
            "{} -> {} -> {} exceeds tolerance {}",
            value,
            formatted,
            parsed,
            tolerance
        );
    }

    #[test]
    fn prop_format_count_round_trips(value in 0u64..u64::MAX / 2) {
        let formatted = format_count(value);
        let parsed: u64 = formatted.replace(',', "").parse().unwrap();
        prop_assert_eq!(parsed, value);
        // Separators appear every three digits from the right
        for group in formatted.split(',').skip(1) {
            prop_assert_eq!(group.len(), 3);
        }
    }

    #[test]
    fn prop_chart_series_preserves_input_order(
        names in prop::collection::vec(metric_name_strategy(), 1..20),
    ) {
        let comparisons: Vec<MetricComparison> = names
            .iter()
            .enumerate()
            .map(|(i, name)| MetricComparison::compute(name, i as f64 + 1.0, i as f64 + 2.0))
            .collect();

        let series = ChartSeries::from_comparisons(&comparisons);
        prop_assert_eq!(&series.labels, &names);

        let rows = table_rows(&comparisons, 1);
        let row_names: Vec<String> = rows.iter().map(|r| r[0].clone()).collect();
        prop_assert_eq!(&row_names, &names);
    }

    #[test]
    fn prop_delta_percent_never_non_finite(
        pre in value_strategy(),
        post in value_strategy(),
    ) {
        let comparison = MetricComparison::compute("m", pre, post);
        if let Some(v) = comparison.delta_percent.as_f64() {
            prop_assert!(v.is_finite());
        }
    }
}

/// End-to-end robustness: arbitrary CSV content must produce a clean
/// exit in either direction, never a crash.
mod cli_robustness {
    use super::*;
    use assert_cmd::prelude::*;
    use std::io::Write;
    use std::process::Command;
    use tempfile::NamedTempFile;

    const NAME: &str = "qbrgen";

    fn csv_content_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            // Well-formed content
            (1u32..1000, 1u32..1000).prop_map(|(pre, post)| {
                format!("metric_name,period,value\nm,pre,{pre}\nm,post,{post}\n")
            }),
            // Wrong header
            Just("foo,bar,baz\n1,2,3\n".to_string()),
            // Garbage
            "[ -~]{0,200}",
            // Empty
            Just(String::new()),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_cli_never_crashes_on_arbitrary_csv(content in csv_content_strategy()) {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(content.as_bytes()).unwrap();
            file.flush().unwrap();

            let output = Command::cargo_bin(NAME)
                .unwrap()
                .arg(file.path())
                .arg("--no-config")
                .arg("--quiet")
                .output()
                .unwrap();

            let code = output.status.code();
            prop_assert!(
                code == Some(0) || code == Some(1),
                "unexpected exit code {:?}",
                code
            );
        }
    }
}
