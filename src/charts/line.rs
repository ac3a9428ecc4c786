//! Genre trends: number of releases per genre and year.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::selection::LegendSelection;
use crate::analysis::{distinct, group_count_nested};
use crate::models::{Dimension, SalesRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreSeries {
    pub genre: String,
    /// One point per year of the chart, zero when the genre had no release.
    pub points: Vec<TrendPoint>,
    pub opacity: f64,
}

impl GenreSeries {
    pub fn total(&self) -> usize {
        self.points.iter().map(|p| p.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreTrends {
    /// Years inside the window that have at least one release, ascending.
    pub years: Vec<i32>,
    pub series: Vec<GenreSeries>,
    pub max_count: usize,
}

pub fn build(
    records: &[SalesRecord],
    window: RangeInclusive<i32>,
    selection: &LegendSelection,
) -> GenreTrends {
    let by_year = group_count_nested(
        records,
        |r| r.year.filter(|year| window.contains(year)),
        |r| Some(r.key(Dimension::Genre)),
    );

    let mut years: Vec<i32> = by_year.keys().copied().collect();
    years.sort_unstable();

    // Genres come from the whole dataset so every chart shares one legend.
    let genres = distinct(records, |r| Some(r.key(Dimension::Genre)));

    let series: Vec<GenreSeries> = genres
        .into_iter()
        .map(|genre| GenreSeries {
            genre: genre.to_string(),
            points: years
                .iter()
                .map(|&year| TrendPoint {
                    year,
                    count: by_year
                        .get(&year)
                        .and_then(|counts| counts.get(genre))
                        .copied()
                        .unwrap_or(0),
                })
                .collect(),
            opacity: selection.opacity(genre),
        })
        .collect();

    let max_count = series
        .iter()
        .flat_map(|s| &s.points)
        .map(|p| p.count)
        .max()
        .unwrap_or(0);

    GenreTrends {
        years,
        series,
        max_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::selection::{DIMMED_OPACITY, FULL_OPACITY};
    use crate::testutil::{record, sample_records};

    fn record_in(year: Option<i32>, genre: &str) -> SalesRecord {
        SalesRecord {
            year,
            ..record("PS2", genre, "EA")
        }
    }

    #[test]
    fn test_years_sorted_and_windowed() {
        let records = vec![
            record_in(Some(2010), "Sports"),
            record_in(Some(1999), "Sports"),
            record_in(Some(2002), "Racing"),
            record_in(Some(2017), "Racing"),
            record_in(Some(2010), "Sports"),
        ];

        let trends = build(&records, 2000..=2016, &LegendSelection::default());

        assert_eq!(trends.years, vec![2002, 2010]);
        assert_eq!(trends.max_count, 2);
    }

    #[test]
    fn test_series_zero_filled() {
        let records = vec![
            record_in(Some(2005), "Sports"),
            record_in(Some(2006), "Racing"),
            record_in(Some(2006), "Sports"),
        ];

        let trends = build(&records, 2000..=2016, &LegendSelection::default());

        let racing = &trends.series[1];
        assert_eq!(racing.genre, "Racing");
        assert_eq!(
            racing.points,
            vec![
                TrendPoint { year: 2005, count: 0 },
                TrendPoint { year: 2006, count: 1 },
            ]
        );
    }

    #[test]
    fn test_records_without_year_are_not_counted() {
        let records = vec![
            record_in(None, "Puzzle"),
            record_in(Some(2008), "Sports"),
        ];

        let trends = build(&records, 2000..=2016, &LegendSelection::default());

        // The genre still gets a (flat) series.
        assert_eq!(trends.series.len(), 2);
        assert_eq!(trends.series[0].genre, "Puzzle");
        assert_eq!(trends.series[0].total(), 0);
        assert_eq!(trends.series[1].total(), 1);
    }

    #[test]
    fn test_sample_trends() {
        let selection = LegendSelection::new(["Shooter"]);
        let trends = build(&sample_records(), 2000..=2016, &selection);

        assert_eq!(trends.years.len(), 11);
        assert_eq!(trends.years.first(), Some(&2001));
        assert_eq!(trends.years.last(), Some(&2015));
        assert_eq!(trends.series.len(), 10);
        assert_eq!(trends.series[0].genre, "Sports");
        assert_eq!(trends.series[0].total(), 3);

        // Unknown Compilation has no genre and still counts for 2008.
        let missing = &trends.series[9];
        assert_eq!(missing.genre, "");
        assert_eq!(missing.total(), 1);
        assert_eq!(trends.max_count, 1);

        for series in &trends.series {
            let expected = if series.genre == "Shooter" {
                FULL_OPACITY
            } else {
                DIMMED_OPACITY
            };
            assert_eq!(series.opacity, expected);
        }
    }
}
