//! Markdown report generation.
//!
//! Every chart is rendered as one section of Markdown tables. Marks that the
//! current selection dims are shown plain, highlighted ones in bold.

use crate::charts::bar::GenrePopularity;
use crate::charts::bubble::GamesLibrary;
use crate::charts::heatmap::{CellComparison, PublisherGenreHeatmap};
use crate::charts::line::GenreTrends;
use crate::charts::pie::{GenreBreakdown, PieSlice, PublisherShare};
use crate::charts::selection::FULL_OPACITY;
use crate::models::{key_label, Report, ReportMetadata};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Video Game Sales Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));

    let charts = &report.charts;

    if charts.is_empty() {
        output.push_str("No charts were built.\n\n");
    }

    if let Some(ref chart) = charts.genre_popularity {
        output.push_str(&generate_genre_popularity_section(chart));
    }
    if let Some(ref chart) = charts.games_library {
        output.push_str(&generate_games_library_section(chart));
    }
    if let Some(ref chart) = charts.heatmap {
        output.push_str(&generate_heatmap_section(chart));
    }
    if let Some(ref chart) = charts.genre_trends {
        output.push_str(&generate_genre_trends_section(chart));
    }
    if let Some(ref chart) = charts.publisher_share {
        output.push_str(&generate_publisher_share_section(
            chart,
            charts.publisher_drill_down.as_ref(),
        ));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Bold a label when it is highlighted and something else is dimmed.
fn highlight(label: &str, opacity: f64, selection_active: bool) -> String {
    if selection_active && opacity >= FULL_OPACITY {
        format!("**{}**", label)
    } else {
        label.to_string()
    }
}

fn table_header(columns: &[String]) -> String {
    let mut header = format!("| {} |\n", columns.join(" | "));

    header.push('|');
    for (i, _) in columns.iter().enumerate() {
        header.push_str(if i == 0 { ":---|" } else { "---:|" });
    }
    header.push('\n');

    header
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();
    let stats = &metadata.load_stats;

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", stats.rows));
    if stats.malformed_sales > 0 {
        section.push_str(&format!(
            "- **Malformed Sales Cells (read as 0):** {}\n",
            stats.malformed_sales
        ));
    }
    if stats.missing_years > 0 {
        section.push_str(&format!("- **Missing Years:** {}\n", stats.missing_years));
    }
    if stats.missing_keys > 0 {
        section.push_str(&format!(
            "- **Missing Platform/Genre/Publisher Cells:** {}\n",
            stats.missing_keys
        ));
    }
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();
    let charts = &report.charts;

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");

    if charts.genre_popularity.is_some() {
        toc.push_str("- [Genre Popularity](#genre-popularity)\n");
    }
    if charts.games_library.is_some() {
        toc.push_str("- [Games Library](#games-library)\n");
    }
    if charts.heatmap.is_some() {
        toc.push_str("- [Publisher x Genre Heatmap](#publisher-x-genre-heatmap)\n");
    }
    if charts.genre_trends.is_some() {
        toc.push_str("- [Genre Trends](#genre-trends)\n");
    }
    if charts.publisher_share.is_some() {
        toc.push_str("- [Publisher Market Share](#publisher-market-share)\n");
    }

    toc.push('\n');

    toc
}

/// Genre rows, one column per top platform.
fn generate_genre_popularity_section(chart: &GenrePopularity) -> String {
    let mut section = String::new();

    section.push_str("## Genre Popularity\n\n");
    section.push_str(&format!(
        "Global sales (millions) per genre for the {} best-selling platforms.\n\n",
        chart.top_platforms.len()
    ));

    if chart.genres.is_empty() {
        section.push_str("No data.\n\n");
        return section;
    }

    let bars = || chart.genres.iter().flat_map(|g| &g.platforms);
    let selection_active = bars().any(|bar| bar.opacity < FULL_OPACITY);

    let mut columns = vec!["Genre".to_string()];
    for platform in &chart.top_platforms {
        let opacity = bars()
            .find(|bar| &bar.platform == platform)
            .map_or(FULL_OPACITY, |bar| bar.opacity);
        columns.push(highlight(key_label(platform), opacity, selection_active));
    }
    section.push_str(&table_header(&columns));

    for genre in &chart.genres {
        let mut row = format!("| {} |", key_label(&genre.genre));
        for platform in &chart.top_platforms {
            match genre.platforms.iter().find(|bar| &bar.platform == platform) {
                Some(bar) => row.push_str(&format!(" {:.2} |", bar.global_sales)),
                None => row.push_str(" - |"),
            }
        }
        row.push('\n');
        section.push_str(&row);
    }

    section.push_str(&format!(
        "\n*Largest genre/platform total: {:.2}M*\n\n",
        chart.max_sales
    ));

    section
}

fn generate_games_library_section(chart: &GamesLibrary) -> String {
    let mut section = String::new();

    section.push_str("## Games Library\n\n");

    if chart.platforms.is_empty() {
        section.push_str("No data.\n\n");
        return section;
    }

    let selection_active = chart.platforms.iter().any(|p| p.opacity < FULL_OPACITY);

    section.push_str(&table_header(&[
        "Platform".to_string(),
        "Games".to_string(),
        "Global Sales".to_string(),
        "NA Sales".to_string(),
        "Years".to_string(),
        "Publishers".to_string(),
    ]));

    for platform in &chart.platforms {
        section.push_str(&format!(
            "| {} | {} | {:.2} | {:.2} | {} | {} |\n",
            highlight(key_label(&platform.platform), platform.opacity, selection_active),
            platform.count,
            platform.total_sales,
            platform.total_na_sales,
            platform.year_range_label(),
            platform.publisher_preview(chart.publisher_preview),
        ));
    }
    section.push('\n');

    section
}

/// Publisher rows, one column per genre; each cell is `count (share%)`.
fn generate_heatmap_section(chart: &PublisherGenreHeatmap) -> String {
    let mut section = String::new();

    section.push_str("## Publisher x Genre Heatmap\n\n");
    section.push_str(
        "Games per genre for the most prolific publishers, with the share of each publisher's catalogue.\n\n",
    );

    if chart.cells.is_empty() {
        section.push_str("No data.\n\n");
        return section;
    }

    let mut columns = vec!["Publisher".to_string()];
    columns.extend(chart.genres.iter().cloned());
    section.push_str(&table_header(&columns));

    for publisher in &chart.publishers {
        let mut row = format!("| {} |", publisher);
        for genre in &chart.genres {
            match chart.cell(publisher, genre) {
                Some(cell) => {
                    row.push_str(&format!(" {} ({:.2}%) |", cell.count, cell.percentage))
                }
                None => row.push_str(" - |"),
            }
        }
        row.push('\n');
        section.push_str(&row);
    }

    section.push_str(&format!(
        "\n*Largest share: {:.2}%*\n\n",
        chart.max_percentage
    ));

    if let Some(ref comparison) = chart.comparison {
        section.push_str(&generate_comparison_block(comparison));
    }

    section
}

fn generate_comparison_block(comparison: &CellComparison) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "### Comparison: {} vs {}\n\n",
        comparison.left, comparison.right
    ));
    block.push_str(&table_header(&[
        "Metric".to_string(),
        comparison.left.clone(),
        comparison.right.clone(),
    ]));

    for metric in &comparison.metrics {
        block.push_str(&format!(
            "| {} | {:.2} | {:.2} |\n",
            metric.metric, metric.left, metric.right
        ));
    }
    block.push('\n');

    block
}

/// Year rows, one column per genre.
fn generate_genre_trends_section(chart: &GenreTrends) -> String {
    let mut section = String::new();

    section.push_str("## Genre Trends\n\n");

    if chart.years.is_empty() {
        section.push_str("No releases in the selected years.\n\n");
        return section;
    }

    let selection_active = chart.series.iter().any(|s| s.opacity < FULL_OPACITY);

    let mut columns = vec!["Year".to_string()];
    columns.extend(
        chart
            .series
            .iter()
            .map(|s| highlight(key_label(&s.genre), s.opacity, selection_active)),
    );
    section.push_str(&table_header(&columns));

    for (i, year) in chart.years.iter().enumerate() {
        let mut row = format!("| {} |", year);
        for series in &chart.series {
            let count = series.points.get(i).map_or(0, |p| p.count);
            row.push_str(&format!(" {} |", count));
        }
        row.push('\n');
        section.push_str(&row);
    }

    let mut totals = "| **Total** |".to_string();
    for series in &chart.series {
        totals.push_str(&format!(" **{}** |", series.total()));
    }
    totals.push('\n');
    section.push_str(&totals);

    section.push_str(&format!(
        "\n*Most releases in one year and genre: {}*\n\n",
        chart.max_count
    ));

    section
}

fn slice_rows(slices: &[PieSlice]) -> String {
    slices
        .iter()
        .map(|s| {
            format!(
                "| {} | {:.2} | {:.2}% |\n",
                key_label(&s.label),
                s.sales,
                s.percentage
            )
        })
        .collect()
}

fn generate_publisher_share_section(
    chart: &PublisherShare,
    drill_down: Option<&GenreBreakdown>,
) -> String {
    let mut section = String::new();

    section.push_str("## Publisher Market Share\n\n");

    if chart.slices.is_empty() {
        section.push_str("No data.\n\n");
        return section;
    }

    section.push_str(&table_header(&[
        "Publisher".to_string(),
        "Global Sales".to_string(),
        "Share".to_string(),
    ]));
    section.push_str(&slice_rows(&chart.slices));
    section.push_str(&format!(
        "| **Total** | **{:.2}** | **100%** |\n\n",
        chart.total_sales
    ));

    if let Some(breakdown) = drill_down {
        section.push_str(&format!("### Genres: {}\n\n", breakdown.publisher));

        if let Some(ref profile) = breakdown.profile {
            section.push_str(&format!("> {}\n\n", profile));
        }

        section.push_str(&table_header(&[
            "Genre".to_string(),
            "Global Sales".to_string(),
            "Share".to_string(),
        ]));
        section.push_str(&slice_rows(&breakdown.slices));
        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by vgsales-insights v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::selection::LegendSelection;
    use crate::charts::{build_charts, ChartKind, ChartOptions, ChartSet};
    use crate::dataset::LoadStats;
    use crate::testutil::sample_records;
    use chrono::Utc;

    fn create_test_metadata() -> ReportMetadata {
        ReportMetadata {
            source: "fixtures/vgsales_sample.csv".to_string(),
            generated_at: Utc::now(),
            load_stats: LoadStats {
                rows: 20,
                malformed_sales: 2,
                missing_years: 1,
                missing_keys: 1,
            },
            duration_seconds: 0.25,
        }
    }

    fn create_test_report(options: &ChartOptions) -> Report {
        Report {
            metadata: create_test_metadata(),
            charts: build_charts(&sample_records(), options, &ChartKind::ALL),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(&ChartOptions::default());
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Video Game Sales Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Genre Popularity"));
        assert!(markdown.contains("## Games Library"));
        assert!(markdown.contains("## Publisher x Genre Heatmap"));
        assert!(markdown.contains("## Genre Trends"));
        assert!(markdown.contains("## Publisher Market Share"));
        assert!(markdown.contains("| Wii | 4 | 151.56 |"));
        assert!(markdown.contains("| PS2 | 4 | 48.22 |"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let section = generate_metadata_section(&create_test_metadata());

        assert!(section.contains("fixtures/vgsales_sample.csv"));
        assert!(section.contains("- **Records:** 20"));
        assert!(section.contains("Malformed Sales Cells (read as 0):** 2"));
        assert!(section.contains("Missing Years:** 1"));
    }

    #[test]
    fn test_only_requested_sections() {
        let report = Report {
            metadata: create_test_metadata(),
            charts: build_charts(
                &sample_records(),
                &ChartOptions::default(),
                &[ChartKind::Pie],
            ),
        };
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("## Publisher Market Share"));
        assert!(!markdown.contains("## Genre Trends"));
        assert!(!markdown.contains("[Genre Trends]"));
    }

    #[test]
    fn test_selection_is_bolded() {
        let options = ChartOptions {
            platform_selection: LegendSelection::new(["Wii"]),
            ..ChartOptions::default()
        };
        let report = create_test_report(&options);
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("| Genre | **Wii** |"));
        assert!(!markdown.contains("**NES**"));
    }

    #[test]
    fn test_heatmap_comparison_and_drill_down() {
        let options = ChartOptions {
            drill_down: Some("Electronic Arts".to_string()),
            compare: vec![
                ("Activision".to_string(), "Shooter".to_string()),
                ("Electronic Arts".to_string(), "Racing".to_string()),
            ],
            ..ChartOptions::default()
        };
        let markdown = generate_markdown_report(&create_test_report(&options));

        assert!(markdown.contains("### Comparison: Activision - Shooter vs Electronic Arts - Racing"));
        assert!(markdown.contains("| Global Sales | 29.40 | 7.20 |"));
        assert!(markdown.contains("### Genres: Electronic Arts"));
        assert!(markdown.contains("| Sports | 13.72 |"));
    }

    #[test]
    fn test_missing_genre_rendered_as_label() {
        let options = ChartOptions {
            drill_down: Some("Activision".to_string()),
            ..ChartOptions::default()
        };
        let markdown = generate_markdown_report(&create_test_report(&options));

        // Unknown Compilation has an empty Genre cell.
        assert!(markdown.contains("| (none) |"));
        assert!(markdown.contains("| (none) | 0.16 | 0.54% |"));
        assert!(!markdown.contains("|  |"));
    }

    #[test]
    fn test_empty_chart_set() {
        let report = Report {
            metadata: create_test_metadata(),
            charts: ChartSet::default(),
        };
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("## Table of Contents"));
        assert!(!markdown.contains("## Games Library"));
        assert!(markdown.contains("No charts were built."));
        assert!(markdown.contains("vgsales-insights"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(&ChartOptions::default());
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"load_stats\""));
        assert!(json.contains("\"genre_popularity\""));
        assert!(json.contains("\"games_library\""));
        assert!(!json.contains("\"publisher_drill_down\""));

        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.charts.len(), 5);
        assert_eq!(parsed.metadata.load_stats, report.metadata.load_stats);
    }
}
