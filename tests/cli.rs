mod cli {
    #![allow(non_snake_case)]

    use assert_cmd::prelude::*;
    use predicates::str::contains;

    use std::io::Write;
    use std::process::Command;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "qbrgen";

    const METRICS_CSV: &str = "metric_name,period,value\n\
                               RFI submissions,pre,516\n\
                               RFI submissions,post,659\n\
                               conversion rate,pre,1.62\n\
                               conversion rate,post,1.94\n";

    const PAGES_CSV: &str =
        "page,sessions_pre,sessions_post,conversions_pre,conversions_post\n\
         /online-degrees/business/mba,1200,1400,24,35\n\
         /online-degrees/health,800,780,10,9\n\
         /internal/sandbox,10,10,1,1\n";

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_output__when_no_files_provided() -> TestResult {
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.assert()
            .failure()
            .stderr(contains("No metrics CSV provided"));
        Ok(())
    }

    #[test]
    fn test_output__text_summary() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path()).arg("--no-config");

        cmd.assert()
            .success()
            .stdout(contains("RFI submissions"))
            .stdout(contains("+143"))
            .stdout(contains("+27.7%"))
            .stdout(contains("+0.3"));
        Ok(())
    }

    #[test]
    fn test_output__json_format() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path())
            .arg("--no-config")
            .arg("--format")
            .arg("json");

        let output = cmd.assert().success().get_output().stdout.clone();
        let text = String::from_utf8(output)?;
        let value: serde_json::Value = serde_json::from_str(&text)?;

        assert_eq!(value["metrics"][0]["metric_name"], "RFI submissions");
        assert_eq!(value["metrics"][0]["delta_absolute"], 143.0);
        assert_eq!(value["chart_series"]["labels"][0], "RFI submissions");
        Ok(())
    }

    #[test]
    fn test_output__minimal_format_has_no_ansi() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path())
            .arg("--no-config")
            .arg("--format")
            .arg("minimal");

        let output = cmd.assert().success().get_output().stdout.clone();
        let text = String::from_utf8(output)?;
        assert!(!text.contains('\x1b'));
        assert!(text.contains("conversion rate"));
        Ok(())
    }

    #[test]
    fn test_output__zero_baseline_renders_sentinel() -> TestResult {
        let metrics = write_temp(
            "metric_name,period,value\n\
             new metric,pre,0\n\
             new metric,post,5\n",
        );
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path()).arg("--no-config");

        cmd.assert()
            .success()
            .stdout(contains("n/a"))
            .stdout(contains("+5"));
        Ok(())
    }

    #[test]
    fn test_error__malformed_csv_names_line() -> TestResult {
        let metrics = write_temp(
            "metric_name,period,value\n\
             a,pre,1\n\
             a,during,2\n",
        );
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path()).arg("--no-config");

        cmd.assert()
            .failure()
            .stderr(contains("line 3"))
            .stderr(contains("during"));
        Ok(())
    }

    #[test]
    fn test_error__missing_counterpart_row() -> TestResult {
        let metrics = write_temp(
            "metric_name,period,value\n\
             a,pre,1\n",
        );
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path()).arg("--no-config");

        cmd.assert()
            .failure()
            .stderr(contains("no 'post' sample"));
        Ok(())
    }

    #[test]
    fn test_error__missing_input_file() -> TestResult {
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg("definitely_missing.csv").arg("--no-config");

        cmd.assert().failure().stderr(contains("File not found"));
        Ok(())
    }

    #[test]
    fn test_report__html_file_is_written() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let dir = tempfile::tempdir()?;
        let report_path = dir.path().join("report.html");
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path())
            .arg("--no-config")
            .arg("--report")
            .arg(&report_path)
            .arg("--title")
            .arg("Q3 Conversion Review");

        cmd.assert()
            .success()
            .stdout(contains("Report written to"));

        let html = std::fs::read_to_string(&report_path)?;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Q3 Conversion Review"));
        assert!(html.contains("cdn.jsdelivr.net/npm/chart.js"));
        assert!(html.contains("#AB0520"));
        assert!(html.contains("#0C234B"));
        Ok(())
    }

    #[test]
    fn test_pages__analysis_included() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let pages = write_temp(PAGES_CSV);
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path())
            .arg("--no-config")
            .arg("--pages")
            .arg(pages.path());

        cmd.assert()
            .success()
            .stdout(contains("Page performance"))
            .stdout(contains("Pages analyzed: 3"))
            .stdout(contains("Top movers"));
        Ok(())
    }

    #[test]
    fn test_pages__exclude_pattern_filters_rows() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let pages = write_temp(PAGES_CSV);
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path())
            .arg("--no-config")
            .arg("--pages")
            .arg(pages.path())
            .arg("--exclude-pattern")
            .arg("^/internal/");

        cmd.assert()
            .success()
            .stdout(contains("Pages analyzed: 2"));
        Ok(())
    }

    #[test]
    fn test_quiet__suppresses_stdout() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path()).arg("--no-config").arg("--quiet");

        let output = cmd.assert().success().get_output().stdout.clone();
        assert!(output.is_empty());
        Ok(())
    }

    #[test]
    fn test_config__file_is_applied() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let config = write_temp("title = \"Configured Title\"\nprecision = 2\n");
        let dir = tempfile::tempdir()?;
        let report_path = dir.path().join("report.html");
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path())
            .arg("--config")
            .arg(config.path())
            .arg("--report")
            .arg(&report_path);

        cmd.assert().success().stdout(contains("Configured Title"));

        let html = std::fs::read_to_string(&report_path)?;
        assert!(html.contains("Configured Title"));
        assert!(html.contains("+27.71%"));
        Ok(())
    }

    #[test]
    fn test_config__invalid_precision_rejected() -> TestResult {
        let metrics = write_temp(METRICS_CSV);
        let config = write_temp("precision = 12\n");
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg(metrics.path()).arg("--config").arg(config.path());

        cmd.assert().failure().stderr(contains("Precision"));
        Ok(())
    }

    #[test]
    fn test_completion_generate__bash() -> TestResult {
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.arg("completion-generate").arg("bash");

        cmd.assert().success().stdout(contains("qbrgen"));
        Ok(())
    }
}
