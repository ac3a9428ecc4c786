//! Data models for the sales dataset.
//!
//! This module contains the core record and metric types shared by the
//! loader, the aggregator, the chart builders and the report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

use crate::charts::ChartSet;
use crate::dataset::LoadStats;

/// Sales region, one per sales column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    NorthAmerica,
    Europe,
    Japan,
    Other,
    Global,
}

impl Region {
    /// All regions, in the order the dataset lists them.
    pub const ALL: [Region; 5] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::Japan,
        Region::Other,
        Region::Global,
    ];

    /// Header of the CSV column holding this region's sales.
    pub fn column(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "NA_Sales",
            Region::Europe => "EU_Sales",
            Region::Japan => "JP_Sales",
            Region::Other => "Other_Sales",
            Region::Global => "Global_Sales",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::NorthAmerica => write!(f, "NA Sales"),
            Region::Europe => write!(f, "EU Sales"),
            Region::Japan => write!(f, "JP Sales"),
            Region::Other => write!(f, "Other Sales"),
            Region::Global => write!(f, "Global Sales"),
        }
    }
}

/// Sales figures in millions of units, one value per region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFigures {
    pub na: f64,
    pub eu: f64,
    pub jp: f64,
    pub other: f64,
    pub global: f64,
}

impl SalesFigures {
    /// Returns the figure for a single region.
    pub fn get(&self, region: Region) -> f64 {
        match region {
            Region::NorthAmerica => self.na,
            Region::Europe => self.eu,
            Region::Japan => self.jp,
            Region::Other => self.other,
            Region::Global => self.global,
        }
    }
}

impl AddAssign for SalesFigures {
    fn add_assign(&mut self, rhs: Self) {
        self.na += rhs.na;
        self.eu += rhs.eu;
        self.jp += rhs.jp;
        self.other += rhs.other;
        self.global += rhs.global;
    }
}

/// Categorical column a record can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Platform,
    Genre,
    Publisher,
}

impl Dimension {
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Platform => "Platform",
            Dimension::Genre => "Genre",
            Dimension::Publisher => "Publisher",
        }
    }
}

/// One row of the dataset. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Sales rank, if the dataset carries one.
    pub rank: Option<u32>,
    /// Game title. Not used by any grouping.
    pub name: String,
    pub platform: String,
    pub genre: String,
    pub publisher: String,
    /// Release year; `None` when the cell was empty or not a year.
    pub year: Option<i32>,
    pub sales: SalesFigures,
}

impl SalesRecord {
    /// Grouping key for a categorical column.
    ///
    /// An empty cell is [`MISSING_KEY`], a bucket of its own, so groupings
    /// keyed this way never drop a record.
    pub fn key(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Platform => &self.platform,
            Dimension::Genre => &self.genre,
            Dimension::Publisher => &self.publisher,
        }
    }

    /// Returns the value of a categorical column, or `None` when it is empty.
    ///
    /// Used where a missing key excludes the record (the heatmap).
    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        Some(self.key(dimension)).filter(|value| *value != MISSING_KEY)
    }
}

/// Key of the bucket holding records with an empty categorical cell.
pub const MISSING_KEY: &str = "";

/// Label shown for [`MISSING_KEY`] in reports.
pub const MISSING_KEY_LABEL: &str = "(none)";

/// Human-readable form of a grouping key.
pub fn key_label(key: &str) -> &str {
    if key == MISSING_KEY {
        MISSING_KEY_LABEL
    } else {
        key
    }
}

/// Inclusive span of release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path or URL the dataset was loaded from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Field-level statistics collected while loading.
    pub load_stats: LoadStats,
    /// Wall-clock time spent loading and aggregating, in seconds.
    pub duration_seconds: f64,
}

/// The complete sales report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub charts: ChartSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::record;

    #[test]
    fn test_sales_figures_add_assign() {
        let mut total = SalesFigures {
            na: 1.0,
            eu: 2.0,
            jp: 3.0,
            other: 0.5,
            global: 6.5,
        };
        total += SalesFigures {
            na: 1.0,
            eu: 1.0,
            jp: 1.0,
            other: 1.0,
            global: 4.0,
        };

        assert_eq!(total.na, 2.0);
        assert_eq!(total.jp, 4.0);
        assert_eq!(total.get(Region::Global), 10.5);
        assert_eq!(total.get(Region::Other), 1.5);
    }

    #[test]
    fn test_region_labels() {
        assert_eq!(Region::NorthAmerica.column(), "NA_Sales");
        assert_eq!(Region::Global.to_string(), "Global Sales");
        assert_eq!(Region::ALL.len(), 5);
    }

    #[test]
    fn test_dimension_missing_when_empty() {
        let rec = record("Wii", "", "Nintendo");
        assert_eq!(rec.dimension(Dimension::Platform), Some("Wii"));
        assert_eq!(rec.dimension(Dimension::Genre), None);
        assert_eq!(rec.dimension(Dimension::Publisher), Some("Nintendo"));
    }

    #[test]
    fn test_key_buckets_empty_cell() {
        let rec = record("Wii", "", "Nintendo");
        assert_eq!(rec.key(Dimension::Platform), "Wii");
        assert_eq!(rec.key(Dimension::Genre), MISSING_KEY);
        assert_eq!(key_label(rec.key(Dimension::Genre)), "(none)");
        assert_eq!(key_label(rec.key(Dimension::Platform)), "Wii");
    }

    #[test]
    fn test_year_range_display() {
        let range = YearRange {
            min: 1985,
            max: 2016,
        };
        assert_eq!(range.to_string(), "1985 - 2016");
    }
}
