//! Games library: one bubble per platform, sized by the number of games.

use serde::{Deserialize, Serialize};

use super::selection::SearchHighlight;
use crate::analysis::{distinct, group_count, rollup, year_range};
use crate::models::{Dimension, SalesRecord, YearRange};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformLibrary {
    pub platform: String,
    pub count: usize,
    pub total_sales: f64,
    pub total_na_sales: f64,
    /// Release years spanned by the platform's games, if any are known.
    pub year_range: Option<YearRange>,
    /// Publishers in first-encounter order. Empty publisher cells are not listed.
    pub publishers: Vec<String>,
    pub opacity: f64,
}

impl PlatformLibrary {
    /// `"min - max"`, or `N/A` when no game has a known year.
    pub fn year_range_label(&self) -> String {
        self.year_range
            .map(|range| range.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// The first `n` publishers, comma separated, with a count of the rest.
    pub fn publisher_preview(&self, n: usize) -> String {
        let shown = self.publishers.iter().take(n).cloned().collect::<Vec<_>>();
        let hidden = self.publishers.len().saturating_sub(n);

        if hidden == 0 {
            shown.join(", ")
        } else {
            format!("{} (+{} more)", shown.join(", "), hidden)
        }
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.platform.as_str()).chain(self.publishers.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamesLibrary {
    pub platforms: Vec<PlatformLibrary>,
    /// Largest game count, for the bubble size scale.
    pub max_count: usize,
    /// Publishers listed per platform in summaries.
    pub publisher_preview: usize,
}

impl GamesLibrary {
    /// Platforms whose name or any publisher matches the search.
    pub fn matching(&self, search: &SearchHighlight) -> Vec<&PlatformLibrary> {
        self.platforms
            .iter()
            .filter(|p| search.matches(p.labels()))
            .collect()
    }
}

pub fn build(
    records: &[SalesRecord],
    search: &SearchHighlight,
    publisher_preview: usize,
) -> GamesLibrary {
    let counts = group_count(records, |r| Some(r.key(Dimension::Platform)));
    let groups = rollup(
        records,
        |r| Some(r.key(Dimension::Platform)),
        Vec::<&SalesRecord>::new,
        |group, record| group.push(record),
    );

    let platforms: Vec<PlatformLibrary> = groups
        .iter()
        .map(|(platform, games)| {
            let mut library = PlatformLibrary {
                platform: platform.to_string(),
                count: counts.get(platform).copied().unwrap_or_default(),
                total_sales: games.iter().map(|r| r.sales.global).sum(),
                total_na_sales: games.iter().map(|r| r.sales.na).sum(),
                year_range: year_range(games.iter().copied()),
                publishers: distinct(games, |r| r.dimension(Dimension::Publisher))
                    .into_iter()
                    .map(String::from)
                    .collect(),
                opacity: 1.0,
            };
            library.opacity = search.opacity(library.labels());
            library
        })
        .collect();

    let max_count = platforms.iter().map(|p| p.count).max().unwrap_or(0);

    GamesLibrary {
        platforms,
        max_count,
        publisher_preview,
    }
}
