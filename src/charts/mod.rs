//! Chart builders.
//!
//! Each chart derives its own tables from the same immutable record slice.
//! Nothing is shared or cached between charts.

pub mod bar;
pub mod bubble;
pub mod heatmap;
pub mod line;
pub mod pie;
pub mod selection;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

use crate::models::SalesRecord;
use bar::GenrePopularity;
use bubble::GamesLibrary;
use heatmap::PublisherGenreHeatmap;
use line::GenreTrends;
use pie::{GenreBreakdown, PublisherShare};
use selection::{LegendSelection, SearchHighlight};

/// The charts a report can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Genre popularity by platform
    Bar,
    /// Games library per platform
    Bubble,
    /// Publisher x genre heatmap
    Heatmap,
    /// Genre release trends
    Line,
    /// Publisher market share
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Bubble,
        ChartKind::Heatmap,
        ChartKind::Line,
        ChartKind::Pie,
    ];
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Bubble => write!(f, "bubble"),
            ChartKind::Heatmap => write!(f, "heatmap"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Pie => write!(f, "pie"),
        }
    }
}

/// Cuts, windows and selection state for one report run.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub top_platforms: usize,
    pub top_publishers: usize,
    pub heatmap_publishers: usize,
    pub trend_years: RangeInclusive<i32>,
    pub publisher_preview: usize,
    pub platform_selection: LegendSelection,
    pub genre_selection: LegendSelection,
    pub search: SearchHighlight,
    pub drill_down: Option<String>,
    /// Heatmap cells to compare, as (publisher, genre).
    pub compare: Vec<(String, String)>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            top_platforms: 10,
            top_publishers: 10,
            heatmap_publishers: 10,
            trend_years: 2000..=2016,
            publisher_preview: 5,
            platform_selection: LegendSelection::default(),
            genre_selection: LegendSelection::default(),
            search: SearchHighlight::default(),
            drill_down: None,
            compare: Vec::new(),
        }
    }
}

/// Every chart built for a report. Charts that were not requested are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_popularity: Option<GenrePopularity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games_library: Option<GamesLibrary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<PublisherGenreHeatmap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_trends: Option<GenreTrends>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_share: Option<PublisherShare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_drill_down: Option<GenreBreakdown>,
}

impl ChartSet {
    pub fn len(&self) -> usize {
        [
            self.genre_popularity.is_some(),
            self.games_library.is_some(),
            self.heatmap.is_some(),
            self.genre_trends.is_some(),
            self.publisher_share.is_some(),
        ]
        .into_iter()
        .filter(|built| *built)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the requested charts.
pub fn build_charts(
    records: &[SalesRecord],
    options: &ChartOptions,
    kinds: &[ChartKind],
) -> ChartSet {
    let mut charts = ChartSet::default();

    for kind in kinds {
        debug!("Building {} chart", kind);

        match kind {
            ChartKind::Bar => {
                charts.genre_popularity = Some(bar::build(
                    records,
                    options.top_platforms,
                    &options.platform_selection,
                ));
            }
            ChartKind::Bubble => {
                charts.games_library = Some(bubble::build(
                    records,
                    &options.search,
                    options.publisher_preview,
                ));
            }
            ChartKind::Heatmap => {
                charts.heatmap = Some(heatmap::build(
                    records,
                    options.heatmap_publishers,
                    &options.compare,
                ));
            }
            ChartKind::Line => {
                charts.genre_trends = Some(line::build(
                    records,
                    options.trend_years.clone(),
                    &options.genre_selection,
                ));
            }
            ChartKind::Pie => {
                charts.publisher_share = Some(pie::build(records, options.top_publishers));

                if let Some(ref publisher) = options.drill_down {
                    charts.publisher_drill_down = pie::drill_down(records, publisher);
                    if charts.publisher_drill_down.is_none() {
                        warn!("No games found for publisher '{}'", publisher);
                    }
                }
            }
        }
    }

    charts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_records;

    #[test]
    fn test_build_all_charts() {
        let charts = build_charts(&sample_records(), &ChartOptions::default(), &ChartKind::ALL);

        assert_eq!(charts.len(), 5);
        assert!(charts.publisher_drill_down.is_none());
    }

    #[test]
    fn test_build_subset() {
        let charts = build_charts(
            &sample_records(),
            &ChartOptions::default(),
            &[ChartKind::Line],
        );

        assert_eq!(charts.len(), 1);
        assert!(charts.genre_trends.is_some());
        assert!(charts.genre_popularity.is_none());
    }

    #[test]
    fn test_drill_down_needs_pie() {
        let options = ChartOptions {
            drill_down: Some("Nintendo".to_string()),
            ..ChartOptions::default()
        };

        let without_pie = build_charts(&sample_records(), &options, &[ChartKind::Bar]);
        assert!(without_pie.publisher_drill_down.is_none());

        let with_pie = build_charts(&sample_records(), &options, &[ChartKind::Pie]);
        let breakdown = with_pie.publisher_drill_down.unwrap();
        assert_eq!(breakdown.publisher, "Nintendo");
        assert_eq!(breakdown.slices[0].label, "Sports");
    }

    #[test]
    fn test_charts_are_independent_of_order() {
        let records = sample_records();
        let options = ChartOptions::default();

        let forward = build_charts(&records, &options, &ChartKind::ALL);
        let mut reversed_kinds = ChartKind::ALL;
        reversed_kinds.reverse();
        let backward = build_charts(&records, &options, &reversed_kinds);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_dataset() {
        let charts = build_charts(&[], &ChartOptions::default(), &ChartKind::ALL);

        assert_eq!(charts.len(), 5);
        assert_eq!(charts.genre_popularity.unwrap().max_sales, 0.0);
        assert_eq!(charts.games_library.unwrap().max_count, 0);
        assert!(charts.heatmap.unwrap().cells.is_empty());
        assert!(charts.genre_trends.unwrap().years.is_empty());
        assert_eq!(charts.publisher_share.unwrap().total_sales, 0.0);
    }

    #[test]
    fn test_chart_kind_serde() {
        let json = serde_json::to_string(&ChartKind::Heatmap).unwrap();
        assert_eq!(json, "\"heatmap\"");
    }
}
