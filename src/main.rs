//! vgsales - video game sales reports
//!
//! A CLI tool that loads a video game sales CSV once, aggregates it into
//! chart-ready tables and writes them as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (invalid arguments or config, dataset load failure, write failure)

mod analysis;
mod charts;
mod cli;
mod config;
mod dataset;
mod models;
mod report;
#[cfg(test)]
mod testutil;

use anyhow::{Context, Result};
use charts::selection::{LegendSelection, SearchHighlight};
use charts::{build_charts, ChartOptions};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use dataset::DataSource;
use models::{Report, ReportMetadata};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("vgsales v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_report(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Report failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .vgsales.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the dataset source, chart cut-offs and report charts.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, build the charts and write the report.
async fn run_report(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let source = DataSource::parse(config.dataset.source.as_deref().unwrap_or_default());

    // Step 1: Load the dataset
    if !args.quiet {
        println!("📥 Loading dataset: {}", source);
    }
    let dataset = dataset::load(
        &source,
        Duration::from_secs(config.dataset.timeout_seconds),
        !args.quiet,
    )
    .await
    .with_context(|| format!("Failed to load dataset from {}", source))?;

    // Step 2: Build the charts
    let options = chart_options(&config, &args);
    let kinds = &config.report.charts;
    if !args.quiet {
        println!(
            "📊 Building {} chart(s) from {} records...",
            kinds.len(),
            dataset.records.len()
        );
    }
    let charts = build_charts(&dataset.records, &options, kinds);

    if let Some(ref library) = charts.games_library {
        if args.search.is_some() {
            let matches = library.matching(&options.search);
            info!("Search matched {} platform(s)", matches.len());
        }
    }
    if !args.compare.is_empty() {
        let compared = charts.heatmap.as_ref().and_then(|h| h.comparison.as_ref());
        if compared.is_none() {
            warn!("Heatmap comparison needs two cells that are on the heatmap");
        }
    }

    // Step 3: Build the report
    let duration = start_time.elapsed().as_secs_f64();

    let report = Report {
        metadata: ReportMetadata {
            source: source.to_string(),
            generated_at: Utc::now(),
            load_stats: dataset.stats.clone(),
            duration_seconds: duration,
        },
        charts,
    };

    // Step 4: Generate and save the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = &config.general.output;
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path))?;

    // Print summary
    if !args.quiet {
        let stats = &report.metadata.load_stats;
        println!("\n📊 Summary:");
        println!("   Records: {}", stats.rows);
        if stats.has_degraded() {
            println!(
                "   Degraded cells: {} sales, {} years, {} keys",
                stats.malformed_sales, stats.missing_years, stats.missing_keys
            );
        }
        println!("   Charts: {}", report.charts.len());
        println!("   Duration: {:.2}s", duration);
        println!("\n✅ Report saved to: {}", output_path);
    }

    Ok(())
}

/// Chart cut-offs from the merged config, selection state from the CLI.
fn chart_options(config: &Config, args: &Args) -> ChartOptions {
    ChartOptions {
        platform_selection: LegendSelection::new(&args.select_platform),
        genre_selection: LegendSelection::new(&args.select_genre),
        search: args
            .search
            .as_deref()
            .map(SearchHighlight::new)
            .unwrap_or_default(),
        drill_down: args.drill_down.clone(),
        compare: args.compare.clone(),
        ..config.charts.to_options()
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_chart_options_from_args() {
        let mut args = make_args();
        args.select_platform = vec!["Wii".to_string()];
        args.search = Some("Nint".to_string());
        args.drill_down = Some("Nintendo".to_string());

        let mut config = Config::default();
        config.charts.top_platforms = 3;

        let options = chart_options(&config, &args);

        assert_eq!(options.top_platforms, 3);
        assert!(options.platform_selection.is_selected("Wii"));
        assert!(options.genre_selection.is_empty());
        assert!(options.search.matches(["Nintendo"]));
        assert_eq!(options.drill_down.as_deref(), Some("Nintendo"));
    }

    #[test]
    fn test_run_report_writes_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("vgsales.csv");
        let output = dir.path().join("report.md");
        std::fs::write(&data, crate::testutil::SAMPLE_CSV).unwrap();

        let mut args = make_args();
        args.data = Some(data.display().to_string());
        args.output = Some(output.clone());
        args.quiet = true;
        args.config = Some(dir.path().join("missing.toml"));

        // An explicit config path that does not exist is an error.
        assert!(tokio_test::block_on(run_report(args.clone())).is_err());

        args.config = None;
        tokio_test::block_on(run_report(args)).unwrap();

        let markdown = std::fs::read_to_string(&output).unwrap();
        assert!(markdown.contains("# Video Game Sales Report"));
        assert!(markdown.contains("- **Records:** 20"));
    }

    #[test]
    fn test_run_report_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();

        let mut args = make_args();
        args.data = Some(dir.path().join("nope.csv").display().to_string());
        args.output = Some(dir.path().join("report.md"));
        args.quiet = true;

        let err = tokio_test::block_on(run_report(args)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load dataset"));
        assert!(!dir.path().join("report.md").exists());
    }
}
