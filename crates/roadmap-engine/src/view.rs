//! Vendor/tab selection, expansion, filters and detail panels

use crate::detail::DetailState;
use crate::filter::FilterState;
use roadmap_model::{EntryId, TechTab, Vendor};
use std::collections::BTreeSet;

/// Everything the user has selected on the timeline
///
/// Switching vendor or tab resets expansion, filters, search and detail
/// panels; nothing carries over between datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    vendor: Vendor,
    tech: TechTab,
    expanded: BTreeSet<EntryId>,
    filters: FilterState,
    details: DetailState,
}

impl ViewState {
    /// Fresh state on the CPU tab of a vendor
    #[must_use]
    pub fn new(vendor: Vendor) -> Self {
        Self {
            vendor,
            tech: TechTab::Cpu,
            expanded: BTreeSet::new(),
            filters: FilterState::default(),
            details: DetailState::default(),
        }
    }

    /// Active vendor
    #[inline]
    #[must_use]
    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Active tab
    #[inline]
    #[must_use]
    pub fn tech(&self) -> TechTab {
        self.tech
    }

    /// Expanded entry ids
    #[inline]
    #[must_use]
    pub fn expanded(&self) -> &BTreeSet<EntryId> {
        &self.expanded
    }

    /// True if the entry is expanded
    #[inline]
    #[must_use]
    pub fn is_expanded(&self, id: &EntryId) -> bool {
        self.expanded.contains(id)
    }

    /// Current filters
    #[inline]
    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Mutable filters
    #[inline]
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// Current detail panels
    #[inline]
    #[must_use]
    pub fn details(&self) -> &DetailState {
        &self.details
    }

    /// Mutable detail panels
    #[inline]
    pub fn details_mut(&mut self) -> &mut DetailState {
        &mut self.details
    }

    /// Move to another vendor's CPU tab with everything reset
    pub fn switch_vendor(&mut self, vendor: Vendor) {
        self.vendor = vendor;
        self.tech = TechTab::Cpu;
        self.reset();
    }

    /// Move to another tab; returns whether anything changed
    ///
    /// Staying on the current tab, or asking for GPU when it is unavailable,
    /// is a no-op.
    pub fn switch_tech(&mut self, tech: TechTab, gpu_available: bool) -> bool {
        if tech == self.tech || (tech == TechTab::Gpu && !gpu_available) {
            return false;
        }
        self.tech = tech;
        self.reset();
        true
    }

    /// Flip one entry's expansion; returns whether it is now expanded
    pub fn toggle_expand(&mut self, id: &EntryId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    /// Expand one entry
    pub fn expand(&mut self, id: &EntryId) {
        self.expanded.insert(id.clone());
    }

    /// Expand exactly the given entries
    pub fn expand_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a EntryId>) {
        self.expanded = ids.into_iter().cloned().collect();
    }

    /// Collapse every entry
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    fn reset(&mut self) {
        self.expanded.clear();
        self.filters.clear();
        self.details.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::RowKey;
    use crate::filter::LegendFacet;
    use proptest::prelude::*;

    fn busy_state() -> ViewState {
        let mut view = ViewState::new(Vendor::Intel);
        view.expand(&"lunar-lake".into());
        view.filters_mut().toggle_legend(LegendFacet::Segment, "mobile");
        view.filters_mut().toggle_legend(LegendFacet::Brand, "Core Ultra");
        view.filters_mut().set_search("258V");
        view.details_mut().toggle_sku(&"lunar-lake".into(), "Core Ultra 200V");
        view.details_mut().select_row(RowKey::new("lunar-lake", "Core Ultra 200V", 0), false);
        view
    }

    #[test]
    fn vendor_switch_resets_everything() {
        let mut view = busy_state();
        view.switch_vendor(Vendor::Amd);
        assert_eq!(view, ViewState::new(Vendor::Amd));
    }

    #[test]
    fn tech_switch_is_noop_on_same_tab_or_missing_gpu() {
        let mut view = busy_state();
        assert!(!view.switch_tech(TechTab::Cpu, true));
        assert!(!view.switch_tech(TechTab::Gpu, false));
        assert!(view.is_expanded(&"lunar-lake".into()));

        assert!(view.switch_tech(TechTab::Gpu, true));
        assert_eq!(view.tech(), TechTab::Gpu);
        assert!(view.expanded().is_empty());
        assert!(view.filters().is_empty());
        assert_eq!(view.details(), &DetailState::default());
    }

    #[test]
    fn toggle_expand_flips() {
        let mut view = ViewState::new(Vendor::Amd);
        let id = EntryId::from("zen2");
        assert!(view.toggle_expand(&id));
        assert!(!view.toggle_expand(&id));
        assert!(!view.is_expanded(&id));
    }

    #[test]
    fn expand_all_replaces_the_expanded_set() {
        let mut view = ViewState::new(Vendor::Amd);
        view.expand(&"stale".into());
        let ids = [EntryId::from("zen1"), EntryId::from("zen2")];
        view.expand_all(&ids);
        assert_eq!(view.expanded().iter().collect::<Vec<_>>(), ids.iter().collect::<Vec<_>>());
    }

    fn vendor_strategy() -> impl Strategy<Value = Vendor> {
        prop_oneof![Just(Vendor::Intel), Just(Vendor::Amd)]
    }

    fn tech_strategy() -> impl Strategy<Value = TechTab> {
        prop_oneof![Just(TechTab::Cpu), Just(TechTab::Gpu)]
    }

    proptest! {
        #[test]
        fn prop_vendor_switch_always_lands_on_clean_cpu_tab(
            from in vendor_strategy(),
            to in vendor_strategy(),
            tech in tech_strategy(),
            ids in prop::collection::vec("[a-z]{1,6}", 0..5),
        ) {
            let mut view = ViewState::new(from);
            view.switch_tech(tech, true);
            let ids: Vec<EntryId> = ids.into_iter().map(EntryId::from).collect();
            view.expand_all(&ids);

            view.switch_vendor(to);
            prop_assert_eq!(view, ViewState::new(to));
        }
    }
}
