//! Publisher market share, with a per-publisher genre breakdown.

use serde::{Deserialize, Serialize};

use crate::analysis::{group_sum, top_n};
use crate::models::{Dimension, SalesRecord};

/// Short background notes for the best-known publishers.
const PUBLISHER_PROFILES: &[(&str, &str)] = &[
    (
        "Nintendo",
        "Founded in 1889 as a playing card company. Home of Mario, Zelda and \
         Pokemon, and maker of the Wii and Switch consoles.",
    ),
    (
        "Electronic Arts",
        "Founded in 1982. Its yearly sports series such as FIFA and Madden NFL \
         dominate the sports genre.",
    ),
    (
        "Activision",
        "Founded in 1979 as the first third-party console publisher. Best known \
         for Call of Duty.",
    ),
    (
        "Sony Computer Entertainment",
        "The PlayStation publisher since 1993, with first-party series such as \
         Gran Turismo and Uncharted.",
    ),
    (
        "Ubisoft",
        "Founded in 1986. Publishes large open-world series including \
         Assassin's Creed and Far Cry.",
    ),
    (
        "Take-Two Interactive",
        "Owner of Rockstar Games, publisher of Grand Theft Auto and Red Dead.",
    ),
    (
        "THQ",
        "Published licensed games such as WWE and SpongeBob for a broad \
         audience until 2013.",
    ),
    (
        "Konami Digital Entertainment",
        "Founded in 1969. Known for Metal Gear Solid, Silent Hill and Pro \
         Evolution Soccer.",
    ),
    (
        "Sega",
        "Founded in 1960. Creator of Sonic the Hedgehog and a former console \
         maker.",
    ),
    (
        "Namco Bandai Games",
        "Publisher of Pac-Man and Tekken, with deep roots in arcade games.",
    ),
];

/// Background note for a publisher, if one is known.
pub fn publisher_profile(publisher: &str) -> Option<&'static str> {
    PUBLISHER_PROFILES
        .iter()
        .find(|(name, _)| *name == publisher)
        .map(|(_, profile)| *profile)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub sales: f64,
    /// Share of the chart total, in percent.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublisherShare {
    pub slices: Vec<PieSlice>,
    /// Sum of the displayed slices.
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreBreakdown {
    pub publisher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub slices: Vec<PieSlice>,
    pub total_sales: f64,
}

fn slices<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> (Vec<PieSlice>, f64) {
    let entries: Vec<(&str, f64)> = entries.into_iter().collect();
    let total: f64 = entries.iter().map(|(_, sales)| sales).sum();

    let slices = entries
        .into_iter()
        .map(|(label, sales)| PieSlice {
            label: label.to_string(),
            sales,
            percentage: if total > 0.0 {
                sales / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    (slices, total)
}

/// The `top` publishers by global sales, largest first.
pub fn build(records: &[SalesRecord], top: usize) -> PublisherShare {
    let by_publisher = group_sum(
        records,
        |r| Some(r.key(Dimension::Publisher)),
        |r| r.sales.global,
    );

    let (slices, total_sales) = slices(top_n(&by_publisher, top));

    PublisherShare {
        slices,
        total_sales,
    }
}

/// Global sales of one publisher split by genre, in first-encounter order.
///
/// Games with no genre form their own slice. Returns `None` when the
/// publisher has no games.
pub fn drill_down(records: &[SalesRecord], publisher: &str) -> Option<GenreBreakdown> {
    let by_genre = group_sum(
        records,
        |r| (r.key(Dimension::Publisher) == publisher).then(|| r.key(Dimension::Genre)),
        |r| r.sales.global,
    );

    if by_genre.is_empty() {
        return None;
    }

    let (slices, total_sales) = slices(by_genre);

    Some(GenreBreakdown {
        publisher: publisher.to_string(),
        profile: publisher_profile(publisher).map(String::from),
        slices,
        total_sales,
    })
}
