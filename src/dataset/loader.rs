//! Reading the CSV source into records.

use csv::StringRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    parse_sales_value, parse_year, try_parse_sales_value, DataSource, Dataset, DatasetLoadError,
    LoadStats,
};
use crate::models::{Dimension, Region, SalesFigures, SalesRecord};

/// Load and parse the dataset from its source.
pub async fn load(
    source: &DataSource,
    timeout: Duration,
    show_progress: bool,
) -> Result<Dataset, DatasetLoadError> {
    let bytes = match source {
        DataSource::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| DatasetLoadError::Io {
                    path: path.clone(),
                    source,
                })?
        }
        DataSource::Url(url) => fetch(url, timeout, show_progress).await?,
    };
    debug!("Read {} bytes from {}", bytes.len(), source);

    let dataset = parse_csv(bytes.as_slice())?;
    let stats = &dataset.stats;
    info!("Loaded {} records from {}", stats.rows, source);

    if stats.has_degraded() {
        warn!(
            "Degraded cells: {} malformed sales values read as 0, {} missing years, {} missing keys",
            stats.malformed_sales, stats.missing_years, stats.missing_keys
        );
    }

    Ok(dataset)
}

/// Fetch a remote dataset, showing a spinner while waiting.
async fn fetch(
    url: &str,
    timeout: Duration,
    show_progress: bool,
) -> Result<Vec<u8>, DatasetLoadError> {
    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching {}", url));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = request(url, timeout).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    result
}

async fn request(url: &str, timeout: Duration) -> Result<Vec<u8>, DatasetLoadError> {
    let http_error = |source: reqwest::Error| DatasetLoadError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_error)?;

    let response = client.get(url).send().await.map_err(http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DatasetLoadError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let body = response.bytes().await.map_err(http_error)?;
    Ok(body.to_vec())
}

/// Parse CSV text into a dataset.
///
/// Columns are located by header name; their order does not matter. Rows
/// shorter than the header are accepted and their missing cells read as
/// empty.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset, DatasetLoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut stats = LoadStats::default();
    let mut records = Vec::new();

    for row in rdr.records() {
        let row = row?;
        records.push(columns.record(&row, &mut stats));
    }
    stats.rows = records.len();

    Ok(Dataset { records, stats })
}

/// Column indices resolved from the header row.
struct Columns {
    rank: Option<usize>,
    name: Option<usize>,
    platform: usize,
    genre: usize,
    publisher: usize,
    year: usize,
    /// One index per entry of [`Region::ALL`].
    sales: [usize; 5],
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetLoadError> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (normalize_header(name), i))
            .collect();

        let find = |name: &str| index.get(&normalize_header(name)).copied();
        let require = |name: &str| {
            find(name).ok_or_else(|| DatasetLoadError::MissingColumn(name.to_string()))
        };

        let mut sales = [0; 5];
        for (slot, region) in sales.iter_mut().zip(Region::ALL) {
            *slot = require(region.column())?;
        }

        Ok(Self {
            rank: find("Rank"),
            name: find("Name"),
            platform: require(Dimension::Platform.column())?,
            genre: require(Dimension::Genre.column())?,
            publisher: require(Dimension::Publisher.column())?,
            year: require("Year")?,
            sales,
        })
    }

    fn record(&self, row: &StringRecord, stats: &mut LoadStats) -> SalesRecord {
        let mut key = |idx: usize| {
            let value = cell(row, Some(idx));
            if value.is_empty() {
                stats.missing_keys += 1;
            }
            value.to_string()
        };
        let platform = key(self.platform);
        let genre = key(self.genre);
        let publisher = key(self.publisher);

        let year = parse_year(cell(row, Some(self.year)));
        if year.is_none() {
            stats.missing_years += 1;
        }

        let mut values = [0.0; 5];
        for (value, idx) in values.iter_mut().zip(self.sales) {
            let raw = cell(row, Some(idx));
            if try_parse_sales_value(raw).is_none() {
                stats.malformed_sales += 1;
            }
            *value = parse_sales_value(raw);
        }
        let [na, eu, jp, other, global] = values;

        SalesRecord {
            rank: cell(row, self.rank).parse().ok(),
            name: cell(row, self.name).to_string(),
            platform,
            genre,
            publisher,
            year,
            sales: SalesFigures {
                na,
                eu,
                jp,
                other,
                global,
            },
        }
    }
}

fn cell(row: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).unwrap_or("")
}

fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_lowercase()
}
