//! Dataset loading and field parsing.
//!
//! The dataset is read once, from a local path or an HTTP(S) URL, and parsed
//! into immutable [`SalesRecord`]s. Individual cells never fail a load: sales
//! figures that do not parse become `0.0`, years that do not parse become
//! `None`, and every such degradation is counted in [`LoadStats`]. Only an
//! unreadable source, a structurally broken CSV or a missing required column
//! is an error.

mod loader;

pub use loader::{load, parse_csv};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::SalesRecord;

/// Failure to obtain or parse the dataset. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("Failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch dataset from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Dataset request to {url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a CLI/config value: `http://` and `https://` are URLs,
    /// anything else is a filesystem path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Url(value.to_string())
        } else {
            DataSource::Path(PathBuf::from(value))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Counts of cells that were degraded while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Data rows read.
    pub rows: usize,
    /// Sales cells that were empty or not a finite number (read as 0).
    pub malformed_sales: usize,
    /// Year cells that were empty or not a year.
    pub missing_years: usize,
    /// Empty Platform, Genre or Publisher cells.
    pub missing_keys: usize,
}

impl LoadStats {
    pub fn has_degraded(&self) -> bool {
        self.malformed_sales > 0 || self.missing_years > 0 || self.missing_keys > 0
    }
}

/// A loaded dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<SalesRecord>,
    pub stats: LoadStats,
}

/// Parse a sales cell, or `None` when it is empty or not a finite number.
pub fn try_parse_sales_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a sales cell, reading anything malformed as `0.0`.
pub fn parse_sales_value(raw: &str) -> f64 {
    try_parse_sales_value(raw).unwrap_or(0.0)
}

/// Parse a year cell.
///
/// Accepts integer text and integral decimals such as `2006.0`. Anything
/// else, including the dataset's `N/A` marker, is `None`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();

    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }

    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.fract() == 0.0)
        .filter(|value| *value >= i32::MIN as f64 && *value <= i32::MAX as f64)
        .map(|value| value as i32)
}
