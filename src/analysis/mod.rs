//! Aggregation over sales records.
//!
//! Generic grouping, ranking and cross-tabulation used by every chart.

pub mod aggregator;

pub use aggregator::*;
