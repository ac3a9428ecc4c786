//! Grouping, ranking and cross-tabulation of records.
//!
//! Every function here is a pure fold over a record slice. Grouped output is
//! an [`IndexMap`] whose iteration order is the order in which each key was
//! first encountered, so results are reproducible for a given input order.
//!
//! Key extractors return `Option<K>`: `None` excludes the record from that
//! particular grouping (the heatmap drops a row with no genre). Groupings that
//! must conserve totals key on [`SalesRecord::key`], which buckets an empty
//! cell instead. Value extractors never fail; malformed numbers were already
//! degraded to zero when the dataset was loaded.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::AddAssign;

use crate::models::{SalesRecord, YearRange};

/// Fold records into per-key accumulators.
///
/// `init` creates the accumulator the first time a key is seen and `fold`
/// merges each record into its key's accumulator.
pub fn rollup<'a, T, K, A>(
    records: &'a [T],
    mut key: impl FnMut(&'a T) -> Option<K>,
    init: impl Fn() -> A,
    mut fold: impl FnMut(&mut A, &'a T),
) -> IndexMap<K, A>
where
    K: Hash + Eq,
{
    records.iter().fold(IndexMap::new(), |mut grouped, record| {
        if let Some(k) = key(record) {
            fold(grouped.entry(k).or_insert_with(&init), record);
        }
        grouped
    })
}

/// Sum a numeric value per key.
pub fn group_sum<'a, T, K>(
    records: &'a [T],
    key: impl FnMut(&'a T) -> Option<K>,
    value: impl Fn(&'a T) -> f64,
) -> IndexMap<K, f64>
where
    K: Hash + Eq,
{
    rollup(records, key, || 0.0, |sum, record| *sum += value(record))
}

/// Count records per key.
pub fn group_count<'a, T, K>(
    records: &'a [T],
    key: impl FnMut(&'a T) -> Option<K>,
) -> IndexMap<K, usize>
where
    K: Hash + Eq,
{
    rollup(records, key, || 0, |count, _| *count += 1)
}

/// Two-level sum: outer key, then inner key, both in first-encounter order.
pub fn group_sum_nested<'a, T, O, I>(
    records: &'a [T],
    mut outer: impl FnMut(&'a T) -> Option<O>,
    mut inner: impl FnMut(&'a T) -> Option<I>,
    value: impl Fn(&'a T) -> f64,
) -> IndexMap<O, IndexMap<I, f64>>
where
    O: Hash + Eq,
    I: Hash + Eq,
{
    let mut nested: IndexMap<O, IndexMap<I, f64>> = IndexMap::new();

    for record in records {
        let (Some(o), Some(i)) = (outer(record), inner(record)) else {
            continue;
        };
        *nested.entry(o).or_default().entry(i).or_default() += value(record);
    }

    nested
}

/// Two-level count: outer key, then inner key, both in first-encounter order.
pub fn group_count_nested<'a, T, O, I>(
    records: &'a [T],
    mut outer: impl FnMut(&'a T) -> Option<O>,
    mut inner: impl FnMut(&'a T) -> Option<I>,
) -> IndexMap<O, IndexMap<I, usize>>
where
    O: Hash + Eq,
    I: Hash + Eq,
{
    let mut nested: IndexMap<O, IndexMap<I, usize>> = IndexMap::new();

    for record in records {
        let (Some(o), Some(i)) = (outer(record), inner(record)) else {
            continue;
        };
        *nested.entry(o).or_default().entry(i).or_default() += 1;
    }

    nested
}

/// Unique keys in first-encounter order.
pub fn distinct<'a, T, K>(records: &'a [T], key: impl FnMut(&'a T) -> Option<K>) -> Vec<K>
where
    K: Hash + Eq,
{
    records
        .iter()
        .filter_map(key)
        .collect::<IndexSet<K>>()
        .into_iter()
        .collect()
}

/// The `n` entries with the largest metric, largest first.
///
/// The sort is stable, so entries with equal metrics keep the order in which
/// their keys were first encountered.
pub fn top_n<K, V>(summary: &IndexMap<K, V>, n: usize) -> Vec<(K, V)>
where
    K: Clone,
    V: Copy + PartialOrd,
{
    let mut ranked: Vec<(K, V)> = summary.iter().map(|(k, v)| (k.clone(), *v)).collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.truncate(n);

    ranked
}

/// Keys of [`top_n`], without their metrics.
pub fn top_keys<K, V>(summary: &IndexMap<K, V>, n: usize) -> Vec<K>
where
    K: Clone,
    V: Copy + PartialOrd,
{
    top_n(summary, n).into_iter().map(|(k, _)| k).collect()
}

/// Entries whose key is one of `allowed`, in the summary's own order.
pub fn filter_to_top_keys<K, V>(summary: &IndexMap<K, V>, allowed: &[K]) -> IndexMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    summary
        .iter()
        .filter(|(k, _)| allowed.contains(*k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// One (outer, inner) cell of a cross-tabulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabCell<M> {
    pub count: usize,
    pub metrics: M,
    /// `100 * count / row total`, where the row total counts every record of
    /// the outer key.
    pub percentage: f64,
}

/// All cells of one outer key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabRow<I: Hash + Eq, M> {
    pub total: usize,
    pub cells: IndexMap<I, CrossTabCell<M>>,
}

impl<I: Hash + Eq, M> Default for CrossTabRow<I, M> {
    fn default() -> Self {
        Self {
            total: 0,
            cells: IndexMap::new(),
        }
    }
}

pub type CrossTab<O, I, M> = IndexMap<O, CrossTabRow<I, M>>;

/// Two-level grouping with a per-cell count, summed metrics and the cell's
/// share of its outer key.
///
/// A record contributes only when both keys are present. Percentages are
/// computed once the whole input has been folded, against the full row total,
/// so restricting the result to a subset of outer keys afterwards does not
/// change them.
pub fn cross_tab<'a, T, O, I, M>(
    records: &'a [T],
    mut outer: impl FnMut(&'a T) -> Option<O>,
    mut inner: impl FnMut(&'a T) -> Option<I>,
    metric: impl Fn(&'a T) -> M,
) -> CrossTab<O, I, M>
where
    O: Hash + Eq,
    I: Hash + Eq,
    M: Default + AddAssign,
{
    let mut tab: CrossTab<O, I, M> = IndexMap::new();

    for record in records {
        let (Some(o), Some(i)) = (outer(record), inner(record)) else {
            continue;
        };

        let row = tab.entry(o).or_default();
        row.total += 1;

        let cell = row.cells.entry(i).or_insert_with(|| CrossTabCell {
            count: 0,
            metrics: M::default(),
            percentage: 0.0,
        });
        cell.count += 1;
        cell.metrics += metric(record);
    }

    for row in tab.values_mut() {
        let total = row.total as f64;
        for cell in row.cells.values_mut() {
            cell.percentage = cell.count as f64 / total * 100.0;
        }
    }

    tab
}

/// Row totals of a cross-tabulation, for ranking outer keys.
pub fn row_totals<O, I, M>(tab: &CrossTab<O, I, M>) -> IndexMap<O, usize>
where
    O: Hash + Eq + Clone,
    I: Hash + Eq,
{
    tab.iter().map(|(o, row)| (o.clone(), row.total)).collect()
}

/// Earliest and latest release year of a group of records.
///
/// Records without a year are skipped; `None` means no record had one.
pub fn year_range<'a>(records: impl IntoIterator<Item = &'a SalesRecord>) -> Option<YearRange> {
    records
        .into_iter()
        .filter_map(|r| r.year)
        .fold(None, |range, year| match range {
            None => Some(YearRange {
                min: year,
                max: year,
            }),
            Some(YearRange { min, max }) => Some(YearRange {
                min: min.min(year),
                max: max.max(year),
            }),
        })
}
