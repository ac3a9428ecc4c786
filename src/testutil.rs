//! Shared test helpers.
//!
//! Record builders and the bundled sample dataset, used by the aggregator,
//! chart and report test modules.

use crate::dataset::parse_csv;
use crate::models::{SalesFigures, SalesRecord};

/// Sample dataset covering every chart, including malformed cells.
pub const SAMPLE_CSV: &str = include_str!("../fixtures/vgsales_sample.csv");

/// A record released in 2006 with zero sales.
pub fn record(platform: &str, genre: &str, publisher: &str) -> SalesRecord {
    SalesRecord {
        rank: None,
        name: "Test".to_string(),
        platform: platform.to_string(),
        genre: genre.to_string(),
        publisher: publisher.to_string(),
        year: Some(2006),
        sales: SalesFigures::default(),
    }
}

/// A record with only its global sales set.
pub fn record_with_sales(
    platform: &str,
    genre: &str,
    publisher: &str,
    global: f64,
) -> SalesRecord {
    SalesRecord {
        sales: SalesFigures {
            global,
            ..SalesFigures::default()
        },
        ..record(platform, genre, publisher)
    }
}

/// Records parsed from [`SAMPLE_CSV`].
pub fn sample_records() -> Vec<SalesRecord> {
    match parse_csv(SAMPLE_CSV.as_bytes()) {
        Ok(dataset) => dataset.records,
        Err(e) => panic!("sample dataset failed to parse: {e}"),
    }
}
