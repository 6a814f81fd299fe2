use clap::{CommandFactory, Parser};
use qbrgen::config::Config;
use qbrgen::ingest;
use qbrgen::metrics::{PageAnalysis, ReportSummary};
use qbrgen::reporting::HtmlReport;
use qbrgen::reporting::logging;
use qbrgen::ui::output;
use qbrgen::ui::{Cli, Commands, cli_to_config, install_completion, print_completions};

fn main() {
    let cli = Cli::parse();

    // Handle completion commands first
    if let Some(exit_code) = handle_completion_commands(&cli) {
        std::process::exit(exit_code);
    }

    // Validate that a metrics file is provided when not using completions
    if cli.metrics.is_none() {
        eprintln!("Error: No metrics CSV provided");
        eprintln!("\nFor more information, try '--help'.");
        std::process::exit(1);
    }

    // Run the main report generation logic
    match run_qbrgen_logic(&cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle completion commands and return exit code if a completion command was processed
fn handle_completion_commands(cli: &Cli) -> Option<i32> {
    match cli.command {
        Some(Commands::CompletionGenerate { shell }) => {
            let mut app = Cli::command();
            print_completions(shell, &mut app);
            Some(0)
        }
        Some(Commands::CompletionInstall { shell }) => match install_completion(shell) {
            Ok(message) => {
                println!("{message}");
                Some(0)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                Some(1)
            }
        },
        None => None,
    }
}

/// Main report generation logic extracted from main() for clarity
fn run_qbrgen_logic(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    // Parse CLI arguments into CliConfig using the derive-based CLI
    let cli_config = cli_to_config(cli);

    // Load and merge configuration
    let config = load_and_merge_config(cli, &cli_config)?;

    // Setup logging
    let verbose = config.verbose.unwrap_or(false);
    logging::init_logger(verbose, cli.quiet);
    logging::log_config_info(&config);

    // Ingest the metric samples
    let Some(metrics_path) = cli.metrics.as_deref() else {
        return Err("no metrics CSV provided".into());
    };
    let comparisons = ingest::load_comparisons(metrics_path)?;
    logging::log_ingest_info(metrics_path, comparisons.len());

    // Optional page-level analysis
    let page_analysis = match cli.pages.as_deref() {
        Some(pages_path) => {
            let patterns = config.compile_exclude_patterns()?;
            let records = ingest::load_page_records(pages_path, &patterns)?;
            let analysis = PageAnalysis::from_records(&records, config.top_movers_or_default());
            logging::log_page_info(
                pages_path,
                analysis.pages.len(),
                analysis.wins,
                analysis.losses,
            );
            Some(analysis)
        }
        None => None,
    };

    let summary = ReportSummary::new(
        config.title_or_default(),
        config.pre_label_or_default(),
        config.post_label_or_default(),
        comparisons,
        page_analysis,
    );

    // Terminal summary
    let precision = config.precision_or_default();
    if !cli.quiet {
        let format = config
            .output_format
            .as_deref()
            .unwrap_or(qbrgen::core::constants::output_formats::DEFAULT);
        let rendered = output::render(&summary, format, precision)?;
        println!("{rendered}");
    }

    // HTML report
    if let Some(report_path) = config.report_path.as_deref() {
        let bytes = HtmlReport::generate_report(&summary, precision, report_path)?;
        logging::log_report_written(report_path, bytes);
        if !cli.quiet {
            println!("Report written to {report_path}");
        }
    }

    Ok(0)
}

/// Load file configuration and merge CLI arguments over it
fn load_and_merge_config(
    cli: &Cli,
    cli_config: &qbrgen::config::CliConfig,
) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli.no_config {
        Config::default()
    } else if let Some(ref path) = cli.config {
        Config::load_from_file(path)?
    } else {
        Config::load_from_standard_locations()
    };

    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}
