//! Highlight state for interactive charts.
//!
//! Legend toggles, search boxes and cell picks are plain values here. Chart
//! builders take them as input and compute an opacity per mark, so nothing
//! in the aggregation pipeline holds mutable UI state.

use std::collections::HashSet;

/// Opacity of a highlighted (or unfiltered) mark.
pub const FULL_OPACITY: f64 = 1.0;

/// Opacity of a mark that is filtered out by the current selection.
pub const DIMMED_OPACITY: f64 = 0.2;

/// Set of legend entries the user has toggled on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegendSelection {
    selected: HashSet<String>,
}

impl LegendSelection {
    /// Selection after clicking each key in turn, so a key given twice ends
    /// up deselected.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().fold(Self::default(), |mut selection, key| {
            selection.toggle(key.as_ref());
            selection
        })
    }

    /// Select `key` if it is not selected, otherwise deselect it.
    pub fn toggle(&mut self, key: &str) {
        if !self.selected.remove(key) {
            self.selected.insert(key.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Every mark is fully visible while nothing is selected; otherwise only
    /// selected marks are.
    pub fn opacity(&self, key: &str) -> f64 {
        if self.is_empty() || self.is_selected(key) {
            FULL_OPACITY
        } else {
            DIMMED_OPACITY
        }
    }
}

/// Case-insensitive substring search over a mark's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHighlight {
    query: String,
}

impl SearchHighlight {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_lowercase(),
        }
    }

    /// Whether any of the labels contains the query. An empty query matches
    /// everything.
    pub fn matches<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> bool {
        labels
            .into_iter()
            .any(|label| label.to_lowercase().contains(&self.query))
    }

    pub fn opacity<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> f64 {
        if self.matches(labels) {
            FULL_OPACITY
        } else {
            DIMMED_OPACITY
        }
    }
}

/// The last two picked items. Picking a third drops the oldest.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSelection<T> {
    items: Vec<T>,
}

impl<T> Default for PairSelection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> PairSelection<T> {
    pub fn select(&mut self, item: T) {
        if self.items.len() == 2 {
            self.items.remove(0);
        }
        self.items.push(item);
    }

    /// The held pair, oldest first, once two items have been picked.
    pub fn pair(&self) -> Option<(&T, &T)> {
        match self.items.as_slice() {
            [first, second] => Some((first, second)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_legend_shows_everything() {
        let selection = LegendSelection::default();
        assert_eq!(selection.opacity("Wii"), FULL_OPACITY);
        assert_eq!(selection.opacity("DS"), FULL_OPACITY);
    }

    #[test]
    fn test_legend_toggle() {
        let mut selection = LegendSelection::default();

        selection.toggle("Wii");
        assert_eq!(selection.opacity("Wii"), FULL_OPACITY);
        assert_eq!(selection.opacity("DS"), DIMMED_OPACITY);

        selection.toggle("DS");
        assert_eq!(selection.opacity("DS"), FULL_OPACITY);

        selection.toggle("Wii");
        selection.toggle("DS");
        assert!(selection.is_empty());
        assert_eq!(selection.opacity("PS2"), FULL_OPACITY);
    }

    #[test]
    fn test_new_replays_clicks() {
        let selection = LegendSelection::new(["Wii", "DS", "Wii"]);

        assert!(!selection.is_selected("Wii"));
        assert!(selection.is_selected("DS"));
    }

    #[test]
    fn test_search_highlight() {
        let search = SearchHighlight::new("NINT");

        assert!(search.matches(["Wii", "Nintendo"]));
        assert!(!search.matches(["PS2", "Sony Computer Entertainment"]));
        assert_eq!(search.opacity(["PS2"]), DIMMED_OPACITY);
        assert_eq!(SearchHighlight::new("").opacity(["PS2"]), FULL_OPACITY);
    }

    #[test]
    fn test_pair_selection_keeps_last_two() {
        let mut picks = PairSelection::default();
        assert_eq!(picks.pair(), None);

        picks.select("a");
        assert_eq!(picks.pair(), None);

        picks.select("b");
        assert_eq!(picks.pair(), Some((&"a", &"b")));

        picks.select("c");
        assert_eq!(picks.pair(), Some((&"b", &"c")));
    }
}
