//! SKU spec drill-down and spec table row selection

use crate::filter::Visibility;
use roadmap_model::{Entry, EntryId, SpecTable};
use std::collections::{BTreeMap, BTreeSet};

/// One row of a SKU's spec table
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    /// Owning entry
    pub entry: EntryId,
    /// SKU whose table holds the row
    pub sku: String,
    /// Row position in the table
    pub row: usize,
}

impl RowKey {
    /// Create a row key
    #[must_use]
    pub fn new(entry: impl Into<EntryId>, sku: impl Into<String>, row: usize) -> Self {
        Self {
            entry: entry.into(),
            sku: sku.into(),
            row,
        }
    }
}

/// Open spec panels and selected rows
///
/// At most one SKU panel is open per entry; the open SKU counts as selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    open: BTreeMap<EntryId, String>,
    selected_rows: BTreeSet<RowKey>,
}

impl DetailState {
    /// Nothing open or selected
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the SKU's panel, closing any other in the entry, or close it if
    /// it is already open; returns whether it is now open
    pub fn toggle_sku(&mut self, entry: &EntryId, sku: &str) -> bool {
        if self.open_sku(entry) == Some(sku) {
            self.open.remove(entry);
            false
        } else {
            self.open.insert(entry.clone(), sku.to_string());
            true
        }
    }

    /// SKU whose panel is open in an entry
    #[must_use]
    pub fn open_sku(&self, entry: &EntryId) -> Option<&str> {
        self.open.get(entry).map(String::as_str)
    }

    /// True if the SKU's panel is open (and so the SKU is marked selected)
    #[must_use]
    pub fn is_open(&self, entry: &EntryId, sku: &str) -> bool {
        self.open_sku(entry) == Some(sku)
    }

    /// True if the entry has an open panel, which shows its collapse button
    #[must_use]
    pub fn has_open(&self, entry: &EntryId) -> bool {
        self.open.contains_key(entry)
    }

    /// Close the entry's open panel; returns whether one was open
    pub fn collapse(&mut self, entry: &EntryId) -> bool {
        self.open.remove(entry).is_some()
    }

    /// Row click: an additive gesture always selects, a plain click toggles;
    /// returns whether the row is now selected
    pub fn select_row(&mut self, key: RowKey, additive: bool) -> bool {
        if additive {
            self.selected_rows.insert(key);
            true
        } else if self.selected_rows.remove(&key) {
            false
        } else {
            self.selected_rows.insert(key);
            true
        }
    }

    /// True if the row is manually selected
    #[must_use]
    pub fn is_row_selected(&self, key: &RowKey) -> bool {
        self.selected_rows.contains(key)
    }

    /// Manually selected rows
    #[must_use]
    pub fn selected_rows(&self) -> &BTreeSet<RowKey> {
        &self.selected_rows
    }

    /// Drop every row selection; panels stay open
    pub fn clear_selections(&mut self) {
        self.selected_rows.clear();
    }

    /// Close everything and drop selections
    pub fn clear(&mut self) {
        self.open.clear();
        self.selected_rows.clear();
    }

    /// Close panels of SKUs that filtering hid; returns the affected entries
    pub fn close_hidden(&mut self, entries: &[Entry], visibility: &Visibility) -> Vec<EntryId> {
        let mut closed = Vec::new();
        self.open.retain(|entry_id, sku_name| {
            let shown = entries
                .iter()
                .find(|e| !e.is_separator() && e.id == *entry_id)
                .and_then(|entry| entry.skus.iter().position(|s| s.name == *sku_name))
                .is_some_and(|i| visibility.is_sku_visible(entry_id, i));
            if !shown {
                closed.push(entry_id.clone());
            }
            shown
        });
        closed
    }

    /// Spec rows whose model name contains `term`, excluding selected rows
    ///
    /// `term` is expected lowercase; an empty term matches nothing.
    #[must_use]
    pub fn search_matches(&self, entries: &[Entry], specs: &SpecTable, term: &str) -> BTreeSet<RowKey> {
        if term.is_empty() {
            return BTreeSet::new();
        }
        entries
            .iter()
            .filter(|e| !e.is_separator())
            .flat_map(move |entry| {
                entry.skus.iter().flat_map(move |sku| {
                    specs
                        .rows(&sku.name)
                        .unwrap_or(&[])
                        .iter()
                        .enumerate()
                        .filter(move |(_, row)| row.name.to_lowercase().contains(term))
                        .map(move |(i, _)| RowKey::new(entry.id.clone(), sku.name.clone(), i))
                })
            })
            .filter(|key| !self.selected_rows.contains(key))
            .collect()
    }

    /// Snapshot for the presenter
    #[must_use]
    pub fn view(&self, search_matches: BTreeSet<RowKey>) -> DetailView {
        DetailView {
            open: self.open.clone(),
            selected_rows: self.selected_rows.clone(),
            search_matches,
        }
    }
}

/// Detail panel state as handed to the presenter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailView {
    /// Open SKU panel per entry
    pub open: BTreeMap<EntryId, String>,
    /// Manually selected rows
    pub selected_rows: BTreeSet<RowKey>,
    /// Rows highlighted by the current search
    pub search_matches: BTreeSet<RowKey>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterState, LegendFacet, SearchIndex};
    use roadmap_model::{CpuSpecRow, Sku, TechTab};

    fn zen4() -> Entry {
        Entry::generation("zen4", "Zen 4", "2022")
            .with_sku(Sku::new("Ryzen 7000", "Raphael").tagged("desktop"))
            .with_sku(Sku::new("Epyc 9004", "Genoa").tagged("server"))
    }

    fn specs() -> SpecTable {
        let mut specs = SpecTable::new();
        specs.insert(
            "Ryzen 7000",
            vec![CpuSpecRow::named("Ryzen 9 7950X"), CpuSpecRow::named("Ryzen 5 7600")],
        );
        specs.insert("Epyc 9004", vec![CpuSpecRow::named("EPYC 9654")]);
        specs
    }

    #[test]
    fn opening_is_exclusive_within_an_entry() {
        let id = EntryId::from("zen4");
        let mut details = DetailState::new();
        assert!(details.toggle_sku(&id, "Ryzen 7000"));
        assert!(details.toggle_sku(&id, "Epyc 9004"));
        assert!(!details.is_open(&id, "Ryzen 7000"));
        assert!(details.is_open(&id, "Epyc 9004"));

        assert!(!details.toggle_sku(&id, "Epyc 9004"));
        assert!(!details.has_open(&id));
    }

    #[test]
    fn panels_in_different_entries_are_independent() {
        let mut details = DetailState::new();
        details.toggle_sku(&"zen4".into(), "Ryzen 7000");
        details.toggle_sku(&"zen5".into(), "Ryzen 9000");
        assert!(details.collapse(&"zen4".into()));
        assert!(!details.collapse(&"zen4".into()));
        assert!(details.has_open(&"zen5".into()));
    }

    #[test]
    fn additive_select_never_deselects() {
        let key = RowKey::new("zen4", "Ryzen 7000", 0);
        let mut details = DetailState::new();
        assert!(details.select_row(key.clone(), false));
        assert!(details.select_row(key.clone(), true));
        assert!(details.is_row_selected(&key));
        assert!(!details.select_row(key.clone(), false));

        details.select_row(key.clone(), true);
        details.clear_selections();
        assert!(details.selected_rows().is_empty());
    }

    #[test]
    fn search_matches_skip_selected_rows() {
        let entries = vec![zen4()];
        let mut details = DetailState::new();
        details.select_row(RowKey::new("zen4", "Ryzen 7000", 0), false);

        let matches = details.search_matches(&entries, &specs(), "ryzen");
        assert_eq!(
            matches.into_iter().collect::<Vec<_>>(),
            vec![RowKey::new("zen4", "Ryzen 7000", 1)]
        );
        assert!(details.search_matches(&entries, &specs(), "").is_empty());
    }

    #[test]
    fn hidden_skus_lose_their_panel() {
        let entries = vec![zen4()];
        let index = SearchIndex::cpu(&entries, &specs());
        let filters = FilterState::new().with_tag(LegendFacet::Segment, "server");
        let visibility = filters.evaluate(TechTab::Cpu, &entries, &index);

        let id = EntryId::from("zen4");
        let mut details = DetailState::new();
        details.toggle_sku(&id, "Ryzen 7000");
        assert_eq!(details.close_hidden(&entries, &visibility), vec![id.clone()]);
        assert!(!details.has_open(&id));

        details.toggle_sku(&id, "Epyc 9004");
        assert!(details.close_hidden(&entries, &visibility).is_empty());
        assert!(details.is_open(&id, "Epyc 9004"));
    }
}
