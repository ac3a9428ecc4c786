//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.vgsales.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::charts::{ChartKind, ChartOptions};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".vgsales.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset source settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Chart cut-offs and windows.
    #[serde(default)]
    pub charts: ChartsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "vgsales_report.md".to_string()
}

/// Where the dataset is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path or URL of the CSV file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Timeout for fetching a remote dataset, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Platforms shown in the genre popularity chart.
    #[serde(default = "default_top")]
    pub top_platforms: usize,

    /// Publishers shown in the market share chart.
    #[serde(default = "default_top")]
    pub top_publishers: usize,

    /// Publisher rows in the heatmap.
    #[serde(default = "default_top")]
    pub heatmap_publishers: usize,

    /// First year of the genre trends window.
    #[serde(default = "default_year_from")]
    pub trend_year_from: i32,

    /// Last year of the genre trends window (inclusive).
    #[serde(default = "default_year_to")]
    pub trend_year_to: i32,

    /// Publishers listed per platform in the games library.
    #[serde(default = "default_publisher_preview")]
    pub publisher_preview: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            top_platforms: default_top(),
            top_publishers: default_top(),
            heatmap_publishers: default_top(),
            trend_year_from: default_year_from(),
            trend_year_to: default_year_to(),
            publisher_preview: default_publisher_preview(),
        }
    }
}

fn default_top() -> usize {
    10
}

fn default_year_from() -> i32 {
    2000
}

fn default_year_to() -> i32 {
    2016
}

fn default_publisher_preview() -> usize {
    5
}

impl ChartsConfig {
    /// Chart options with these cut-offs and no selection.
    pub fn to_options(&self) -> ChartOptions {
        ChartOptions {
            top_platforms: self.top_platforms,
            top_publishers: self.top_publishers,
            heatmap_publishers: self.heatmap_publishers,
            trend_years: self.trend_year_from..=self.trend_year_to,
            publisher_preview: self.publisher_preview,
            ..ChartOptions::default()
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Charts to include, in report order.
    #[serde(default = "default_charts")]
    pub charts: Vec<ChartKind>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            charts: default_charts(),
        }
    }
}

fn default_charts() -> Vec<ChartKind> {
    ChartKind::ALL.to_vec()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(ref data) = args.data {
            self.dataset.source = Some(data.clone());
        }
        if let Some(timeout) = args.timeout {
            self.dataset.timeout_seconds = timeout;
        }

        if let Some(n) = args.top_platforms {
            self.charts.top_platforms = n;
        }
        if let Some(n) = args.top_publishers {
            self.charts.top_publishers = n;
        }
        if let Some(n) = args.heatmap_publishers {
            self.charts.heatmap_publishers = n;
        }
        if let Some(year) = args.year_from {
            self.charts.trend_year_from = year;
        }
        if let Some(year) = args.year_to {
            self.charts.trend_year_to = year;
        }

        if let Some(ref charts) = args.charts {
            self.report.charts = charts.clone();
        }
    }

    /// Check settings that only make sense once file and CLI are merged.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.source.is_none() {
            bail!("No dataset given. Use --data, VGSALES_DATA or [dataset].source");
        }
        if self.dataset.timeout_seconds == 0 {
            bail!("Timeout must be at least 1 second");
        }
        if self.charts.trend_year_from > self.charts.trend_year_to {
            bail!(
                "Trend window is empty: {} is after {}",
                self.charts.trend_year_from,
                self.charts.trend_year_to
            );
        }
        if self.report.charts.is_empty() {
            bail!("No charts selected");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
