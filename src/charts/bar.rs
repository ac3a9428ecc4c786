//! Genre popularity: global sales per genre, split by the top platforms.

use serde::{Deserialize, Serialize};

use super::selection::LegendSelection;
use crate::analysis::{filter_to_top_keys, group_sum, group_sum_nested, top_keys};
use crate::models::{Dimension, SalesRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformBar {
    pub platform: String,
    pub global_sales: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreGroup {
    pub genre: String,
    pub platforms: Vec<PlatformBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenrePopularity {
    /// Platforms with the highest total global sales, best first.
    pub top_platforms: Vec<String>,
    /// Genres in first-encounter order, each restricted to the top platforms.
    /// Records with no genre form the [`MISSING_KEY`](crate::models::MISSING_KEY) group.
    pub genres: Vec<GenreGroup>,
    /// Largest single bar, for the value axis.
    pub max_sales: f64,
}

pub fn build(records: &[SalesRecord], top: usize, selection: &LegendSelection) -> GenrePopularity {
    let by_genre = group_sum_nested(
        records,
        |r| Some(r.key(Dimension::Genre)),
        |r| Some(r.key(Dimension::Platform)),
        |r| r.sales.global,
    );

    let platform_totals = group_sum(
        records,
        |r| Some(r.key(Dimension::Platform)),
        |r| r.sales.global,
    );
    let top_platforms = top_keys(&platform_totals, top);

    let genres: Vec<GenreGroup> = by_genre
        .iter()
        .map(|(genre, platforms)| GenreGroup {
            genre: genre.to_string(),
            platforms: filter_to_top_keys(platforms, &top_platforms)
                .into_iter()
                .map(|(platform, global_sales)| PlatformBar {
                    platform: platform.to_string(),
                    global_sales,
                    opacity: selection.opacity(platform),
                })
                .collect(),
        })
        .collect();

    let max_sales = genres
        .iter()
        .flat_map(|g| &g.platforms)
        .map(|bar| bar.global_sales)
        .fold(0.0, f64::max);

    GenrePopularity {
        top_platforms: top_platforms.into_iter().map(String::from).collect(),
        genres,
        max_sales,
    }
}
