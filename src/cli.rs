//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

use crate::charts::ChartKind;

/// vgsales - video game sales reports from the command line
///
/// Loads a video game sales CSV (local file or URL), aggregates it into
/// genre, platform and publisher charts and writes a Markdown or JSON
/// report.
///
/// Examples:
///   vgsales --data vgsales.csv
///   vgsales --data https://example.com/vgsales.csv --format json -o report.json
///   vgsales --data vgsales.csv --charts pie --drill-down Nintendo
///   vgsales --data vgsales.csv --compare Nintendo:Sports --compare Activision:Shooter
///   vgsales --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path or http(s) URL of the sales CSV
    ///
    /// Can also be set via VGSALES_DATA env var or .vgsales.toml config.
    #[arg(short, long, value_name = "SRC", env = "VGSALES_DATA")]
    pub data: Option<String>,

    /// Output file path for the report [default: vgsales_report.md]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .vgsales.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Charts to include (comma-separated) [default: all]
    ///
    /// Example: --charts bar,pie
    #[arg(long, value_name = "CHARTS", value_delimiter = ',')]
    pub charts: Option<Vec<ChartKind>>,

    /// Platforms shown in the genre popularity chart [default: 10]
    #[arg(long, value_name = "N")]
    pub top_platforms: Option<usize>,

    /// Publishers shown in the market share chart [default: 10]
    #[arg(long, value_name = "N")]
    pub top_publishers: Option<usize>,

    /// Publisher rows in the heatmap [default: 10]
    #[arg(long, value_name = "N")]
    pub heatmap_publishers: Option<usize>,

    /// First year of the genre trends window [default: 2000]
    #[arg(long, value_name = "YEAR")]
    pub year_from: Option<i32>,

    /// Last year of the genre trends window [default: 2016]
    #[arg(long, value_name = "YEAR")]
    pub year_to: Option<i32>,

    /// Highlight a platform in the genre popularity chart (repeatable)
    #[arg(long = "select-platform", value_name = "PLATFORM")]
    pub select_platform: Vec<String>,

    /// Highlight a genre in the genre trends chart (repeatable)
    #[arg(long = "select-genre", value_name = "GENRE")]
    pub select_genre: Vec<String>,

    /// Highlight platforms whose name or publishers contain this text
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Break one publisher's sales down by genre
    #[arg(long, value_name = "PUBLISHER")]
    pub drill_down: Option<String>,

    /// Heatmap cell to compare, given twice
    ///
    /// Example: --compare Nintendo:Sports --compare Activision:Shooter
    #[arg(long, value_name = "PUBLISHER:GENRE", value_parser = parse_cell_pick)]
    pub compare: Vec<(String, String)>,

    /// Timeout for fetching a remote dataset, in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .vgsales.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Parse a `PUBLISHER:GENRE` heatmap cell.
///
/// Splits on the last colon, so publishers may contain one.
pub fn parse_cell_pick(value: &str) -> Result<(String, String), String> {
    let (publisher, genre) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("Expected PUBLISHER:GENRE, got '{}'", value))?;

    let (publisher, genre) = (publisher.trim(), genre.trim());
    if publisher.is_empty() || genre.is_empty() {
        return Err(format!("Expected PUBLISHER:GENRE, got '{}'", value));
    }

    Ok((publisher.to_string(), genre.to_string()))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for (flag, value) in [
            ("--top-platforms", self.top_platforms),
            ("--top-publishers", self.top_publishers),
            ("--heatmap-publishers", self.heatmap_publishers),
        ] {
            if value == Some(0) {
                return Err(format!("{} must be at least 1", flag));
            }
        }

        if let (Some(from), Some(to)) = (self.year_from, self.year_to) {
            if from > to {
                return Err(format!("--year-from {} is after --year-to {}", from, to));
            }
        }

        if self.compare.len() > 2 {
            return Err("--compare can be given at most twice".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref data) = self.data {
            if data.trim().is_empty() {
                return Err("Dataset source must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            data: Some("vgsales.csv".to_string()),
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            charts: None,
            top_platforms: None,
            top_publishers: None,
            heatmap_publishers: None,
            year_from: None,
            year_to: None,
            select_platform: Vec::new(),
            select_genre: Vec::new(),
            search: None,
            drill_down: None,
            compare: Vec::new(),
            timeout: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_args() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_top() {
        let mut args = make_args();
        args.heatmap_publishers = Some(0);
        assert_eq!(
            args.validate().unwrap_err(),
            "--heatmap-publishers must be at least 1"
        );
    }

    #[test]
    fn test_validation_year_window() {
        let mut args = make_args();
        args.year_from = Some(2010);
        args.year_to = Some(2005);
        assert!(args.validate().is_err());

        args.year_to = Some(2010);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_too_many_compares() {
        let mut args = make_args();
        args.compare = vec![
            ("A".to_string(), "x".to_string()),
            ("B".to_string(), "y".to_string()),
            ("C".to_string(), "z".to_string()),
        ];
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_cell_pick() {
        assert_eq!(
            parse_cell_pick("Nintendo:Sports"),
            Ok(("Nintendo".to_string(), "Sports".to_string()))
        );
        assert_eq!(
            parse_cell_pick("Studio: The Sequel : Action"),
            Ok(("Studio: The Sequel".to_string(), "Action".to_string()))
        );
        assert!(parse_cell_pick("Nintendo").is_err());
        assert!(parse_cell_pick(":Sports").is_err());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "vgsales",
            "--data",
            "vgsales.csv",
            "--charts",
            "bar,pie",
            "--select-platform",
            "Wii",
            "--select-platform",
            "DS",
            "--compare",
            "Nintendo:Sports",
        ])
        .unwrap();

        assert_eq!(args.charts, Some(vec![ChartKind::Bar, ChartKind::Pie]));
        assert_eq!(args.select_platform, vec!["Wii", "DS"]);
        assert_eq!(args.compare.len(), 1);
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
