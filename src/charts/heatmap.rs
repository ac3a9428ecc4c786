//! Publisher x genre heatmap for the most prolific publishers.
//!
//! Each cell holds the number of games a publisher released in a genre, the
//! summed regional sales of those games, and the cell's share of everything
//! the publisher released. Two picked cells can be compared region by region.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::selection::PairSelection;
use crate::analysis::{cross_tab, distinct, filter_to_top_keys, row_totals, top_keys};
use crate::models::{Dimension, Region, SalesFigures, SalesRecord};

/// Region order used by the side-by-side comparison.
const COMPARISON_METRICS: [Region; 5] = [
    Region::NorthAmerica,
    Region::Europe,
    Region::Japan,
    Region::Global,
    Region::Other,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub publisher: String,
    pub genre: String,
    pub count: usize,
    pub sales: SalesFigures,
    /// Share of the publisher's games, in percent.
    pub percentage: f64,
}

impl HeatmapCell {
    pub fn label(&self) -> String {
        format!("{} - {}", self.publisher, self.genre)
    }
}

/// Up to two picked heatmap cells.
pub type CellSelection<'a> = PairSelection<&'a HeatmapCell>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: Region,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellComparison {
    pub left: String,
    pub right: String,
    pub metrics: Vec<MetricComparison>,
    /// Largest value on either side, for a shared scale.
    pub max_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherGenreHeatmap {
    /// Publishers with the most games, most first.
    pub publishers: Vec<String>,
    /// Genres present in the retained cells, in first-encounter order.
    pub genres: Vec<String>,
    pub cells: Vec<HeatmapCell>,
    pub max_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<CellComparison>,
}

impl PublisherGenreHeatmap {
    pub fn cell(&self, publisher: &str, genre: &str) -> Option<&HeatmapCell> {
        self.cells
            .iter()
            .find(|c| c.publisher == publisher && c.genre == genre)
    }

    /// Pick cells in order and compare the last two picked.
    ///
    /// Picks that name a cell not on the heatmap are skipped.
    pub fn compare_picks(&self, picks: &[(String, String)]) -> Option<CellComparison> {
        let mut selection = CellSelection::default();

        for (publisher, genre) in picks {
            match self.cell(publisher, genre) {
                Some(cell) => selection.select(cell),
                None => warn!("No heatmap cell for {} - {}", publisher, genre),
            }
        }

        selection.pair().map(|(left, right)| compare(left, right))
    }
}

pub fn build(
    records: &[SalesRecord],
    top: usize,
    picks: &[(String, String)],
) -> PublisherGenreHeatmap {
    let tab = cross_tab(
        records,
        |r| r.dimension(Dimension::Publisher),
        |r| r.dimension(Dimension::Genre),
        |r| r.sales,
    );

    let top_publishers = top_keys(&row_totals(&tab), top);
    let kept = filter_to_top_keys(&tab, &top_publishers);

    let cells: Vec<HeatmapCell> = kept
        .iter()
        .flat_map(|(publisher, row)| {
            row.cells.iter().map(move |(genre, cell)| HeatmapCell {
                publisher: publisher.to_string(),
                genre: genre.to_string(),
                count: cell.count,
                sales: cell.metrics,
                percentage: cell.percentage,
            })
        })
        .collect();

    let genres = distinct(&cells, |c| Some(c.genre.clone()));
    let max_percentage = cells.iter().map(|c| c.percentage).fold(0.0, f64::max);

    let mut heatmap = PublisherGenreHeatmap {
        publishers: top_publishers.into_iter().map(String::from).collect(),
        genres,
        cells,
        max_percentage,
        comparison: None,
    };
    heatmap.comparison = heatmap.compare_picks(picks);

    heatmap
}

/// Compare two cells region by region.
pub fn compare(left: &HeatmapCell, right: &HeatmapCell) -> CellComparison {
    let metrics: Vec<MetricComparison> = COMPARISON_METRICS
        .iter()
        .map(|&metric| MetricComparison {
            metric,
            left: left.sales.get(metric),
            right: right.sales.get(metric),
        })
        .collect();

    let max_value = metrics
        .iter()
        .flat_map(|m| [m.left, m.right])
        .fold(0.0, f64::max);

    CellComparison {
        left: left.label(),
        right: right.label(),
        metrics,
        max_value,
    }
}
