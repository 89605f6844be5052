//! Visibility filtering
//!
//! [`FilterState`] holds the facet selections and search term. Evaluating it
//! against a dataset and its [`SearchIndex`] yields a [`Visibility`] report;
//! evaluation is pure, so the same state and data always give the same
//! report.
//!
//! CPU entries are filtered per SKU: an entry is shown only if at least one
//! of its SKUs passes every active constraint. GPU entries are filtered as a
//! whole. Separators are never filtered directly; one is visible when a
//! visible entry follows it before the next separator.

use roadmap_model::{Entry, EntryId, FormFactor, GpuSegment, Sku, SpecTable, TechTab};
use std::collections::BTreeSet;

/// Which CPU legend a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegendFacet {
    /// Market segment tags (desktop, server, ...)
    Segment,
    /// Brand tags (Ryzen, Xeon, ...)
    Brand,
}

/// Facet selections and search term
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    segment_tags: BTreeSet<String>,
    brand_tags: BTreeSet<String>,
    gpu_segment: Option<GpuSegment>,
    gpu_form_factor: Option<FormFactor>,
}

impl FilterState {
    /// No constraints
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: search term
    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        self.set_search(term);
        self
    }

    /// Builder: add a legend tag
    #[must_use]
    pub fn with_tag(mut self, facet: LegendFacet, tag: impl Into<String>) -> Self {
        self.tags_mut(facet).insert(tag.into());
        self
    }

    /// Builder: GPU segment
    #[must_use]
    pub fn with_gpu_segment(mut self, segment: GpuSegment) -> Self {
        self.gpu_segment = Some(segment);
        self
    }

    /// Builder: GPU form factor
    #[must_use]
    pub fn with_gpu_form(mut self, form: FormFactor) -> Self {
        self.gpu_form_factor = Some(form);
        self
    }

    /// Lowercased search term; empty when not searching
    #[inline]
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Active segment tags
    #[inline]
    #[must_use]
    pub fn segment_tags(&self) -> &BTreeSet<String> {
        &self.segment_tags
    }

    /// Active brand tags
    #[inline]
    #[must_use]
    pub fn brand_tags(&self) -> &BTreeSet<String> {
        &self.brand_tags
    }

    /// Active tags of one legend
    #[inline]
    #[must_use]
    pub fn tags(&self, facet: LegendFacet) -> &BTreeSet<String> {
        match facet {
            LegendFacet::Segment => &self.segment_tags,
            LegendFacet::Brand => &self.brand_tags,
        }
    }

    fn tags_mut(&mut self, facet: LegendFacet) -> &mut BTreeSet<String> {
        match facet {
            LegendFacet::Segment => &mut self.segment_tags,
            LegendFacet::Brand => &mut self.brand_tags,
        }
    }

    /// Selected GPU segment; `None` means all
    #[inline]
    #[must_use]
    pub fn gpu_segment(&self) -> Option<GpuSegment> {
        self.gpu_segment
    }

    /// Selected GPU form factor; `None` means all
    #[inline]
    #[must_use]
    pub fn gpu_form_factor(&self) -> Option<FormFactor> {
        self.gpu_form_factor
    }

    /// True if nothing is constrained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set the search term, lowercased; returns whether it changed
    pub fn set_search(&mut self, term: &str) -> bool {
        let term = term.to_lowercase();
        if term == self.search_term {
            return false;
        }
        self.search_term = term;
        true
    }

    /// Segment button: `all` clears, anything else becomes the only tag
    pub fn select_segment(&mut self, filter: &str) {
        self.segment_tags.clear();
        if filter != "all" {
            self.segment_tags.insert(filter.to_string());
        }
    }

    /// Legend click: flip one tag's membership; returns whether it is now active
    pub fn toggle_legend(&mut self, facet: LegendFacet, tag: &str) -> bool {
        let tags = self.tags_mut(facet);
        if tags.remove(tag) {
            false
        } else {
            tags.insert(tag.to_string());
            true
        }
    }

    /// GPU segment button; `None` selects all
    pub fn select_gpu_segment(&mut self, segment: Option<GpuSegment>) {
        self.gpu_segment = segment;
    }

    /// GPU form button: toggles between `form` and all
    pub fn toggle_gpu_form(&mut self, form: FormFactor) {
        self.gpu_form_factor = if self.gpu_form_factor == Some(form) {
            None
        } else {
            Some(form)
        };
    }

    /// Drop every constraint
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn search_hit(&self, text: &str) -> bool {
        self.search_term.is_empty() || text.contains(&self.search_term)
    }

    fn tag_hit<'a>(active: &BTreeSet<String>, mut tags: impl Iterator<Item = &'a str>) -> bool {
        active.is_empty() || tags.any(|tag| active.contains(tag))
    }

    fn sku_visible(&self, sku: &Sku, text: &str) -> bool {
        Self::tag_hit(&self.segment_tags, sku.tags.iter().map(String::as_str))
            && Self::tag_hit(&self.brand_tags, sku.brand.as_deref().into_iter())
            && self.search_hit(text)
    }

    fn evaluate_cpu(&self, entry: &Entry, text: &EntryText) -> (bool, Vec<bool>) {
        let skus: Vec<bool> = entry
            .skus
            .iter()
            .zip(&text.skus)
            .map(|(sku, sku_text)| self.sku_visible(sku, sku_text))
            .collect();

        let entry_level = Self::tag_hit(&self.segment_tags, entry.segment_tags().into_iter())
            && Self::tag_hit(&self.brand_tags, entry.brand_tags().into_iter())
            && self.search_hit(&text.blob);

        (entry_level && skus.iter().any(|v| *v), skus)
    }

    fn evaluate_gpu(&self, entry: &Entry, text: &EntryText) -> bool {
        self.gpu_segment.map_or(true, |s| entry.gpu_segment() == s)
            && self.gpu_form_factor.map_or(true, |f| entry.has_form_factor(f))
            && self.search_hit(&text.blob)
    }

    /// Whether one non-separator entry passes the current filters
    ///
    /// Separators always report `false` here; their visibility depends on
    /// their neighbours and comes from [`FilterState::evaluate`].
    #[must_use]
    pub fn is_visible(&self, tech: TechTab, entry: &Entry, text: &EntryText) -> bool {
        if entry.is_separator() {
            return false;
        }
        match tech {
            TechTab::Cpu => self.evaluate_cpu(entry, text).0,
            TechTab::Gpu => self.evaluate_gpu(entry, text),
        }
    }

    /// Visibility of every entry, SKU and separator in a dataset
    ///
    /// `index` must have been built from the same `entries`.
    #[must_use]
    pub fn evaluate(&self, tech: TechTab, entries: &[Entry], index: &SearchIndex) -> Visibility {
        let empty = EntryText::default();
        let mut report: Vec<EntryVisibility> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let text = index.get(i).unwrap_or(&empty);
                let (visible, skus) = match (entry.is_separator(), tech) {
                    (true, _) => (false, Vec::new()),
                    (false, TechTab::Cpu) => self.evaluate_cpu(entry, text),
                    (false, TechTab::Gpu) => (self.evaluate_gpu(entry, text), Vec::new()),
                };
                EntryVisibility {
                    id: entry.id.clone(),
                    separator: entry.is_separator(),
                    visible,
                    skus,
                }
            })
            .collect();

        // Walk backwards so each separator sees its whole section
        let mut section_visible = false;
        for item in report.iter_mut().rev() {
            if item.separator {
                item.visible = section_visible;
                section_visible = false;
            } else {
                section_visible |= item.visible;
            }
        }

        Visibility { entries: report }
    }
}

/// Precomputed lowercase search text for one entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryText {
    /// Whole-entry text
    pub blob: String,
    /// Per-SKU text, aligned with `Entry::skus` (CPU only)
    pub skus: Vec<String>,
}

/// Search text for a dataset, aligned with entry positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    texts: Vec<EntryText>,
}

impl SearchIndex {
    /// Build the index for the active tab
    #[must_use]
    pub fn build(tech: TechTab, entries: &[Entry], specs: &SpecTable) -> Self {
        match tech {
            TechTab::Cpu => Self::cpu(entries, specs),
            TechTab::Gpu => Self::gpu(entries),
        }
    }

    /// CPU text: name, segment, subtitle and per-SKU name, description,
    /// tags, brand and spec table model names
    #[must_use]
    pub fn cpu(entries: &[Entry], specs: &SpecTable) -> Self {
        let texts = entries
            .iter()
            .map(|entry| {
                if entry.is_separator() {
                    return EntryText::default();
                }
                let skus: Vec<String> = entry
                    .skus
                    .iter()
                    .map(|sku| sku_parts(sku, specs).join("|").to_lowercase())
                    .collect();
                let mut parts = vec![
                    entry.arch.as_str(),
                    entry.segment.as_deref().unwrap_or(""),
                    entry.subtitle.as_deref().unwrap_or(""),
                ];
                parts.extend(entry.skus.iter().flat_map(|sku| sku_parts(sku, specs)));
                EntryText {
                    blob: parts.join("|").to_lowercase(),
                    skus,
                }
            })
            .collect();
        Self { texts }
    }

    /// GPU text: name, subtitle, family, description and per-model fields
    /// for the family's table layout
    #[must_use]
    pub fn gpu(entries: &[Entry]) -> Self {
        let texts = entries
            .iter()
            .map(|entry| {
                if entry.is_separator() {
                    return EntryText::default();
                }
                let mut parts = vec![entry.arch.clone(), entry.subtitle.clone().unwrap_or_default()];
                if let Some(specs) = &entry.gpu_specs {
                    let fields = specs.layout().search_fields();
                    parts.push(specs.family.clone());
                    parts.push(specs.desc.clone());
                    parts.extend(specs.models.iter().map(|model| {
                        std::iter::once(model.name.clone())
                            .chain(fields.iter().map(|key| model.field(key)))
                            .collect::<Vec<_>>()
                            .join(" ")
                    }));
                }
                EntryText {
                    blob: parts.join("|").to_lowercase(),
                    skus: Vec::new(),
                }
            })
            .collect();
        Self { texts }
    }

    /// Text for the entry at `position`
    #[inline]
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&EntryText> {
        self.texts.get(position)
    }

    /// Number of indexed entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// True if nothing is indexed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

fn sku_parts<'a>(sku: &'a Sku, specs: &'a SpecTable) -> Vec<&'a str> {
    let mut parts = vec![sku.name.as_str(), sku.desc.as_str()];
    parts.extend(sku.tags.iter().map(String::as_str));
    parts.push(sku.brand.as_deref().unwrap_or(""));
    parts.extend(specs.model_names(&sku.name));
    parts
}

/// Visibility of one dataset entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryVisibility {
    /// Entry id (often empty for separators)
    pub id: EntryId,
    /// True for era separators
    pub separator: bool,
    /// Shown or hidden
    pub visible: bool,
    /// Per-SKU visibility, aligned with `Entry::skus` (CPU only)
    pub skus: Vec<bool>,
}

/// Visibility report for a whole dataset, aligned with entry positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    entries: Vec<EntryVisibility>,
}

impl Visibility {
    /// Report for the entry at `position`
    #[inline]
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&EntryVisibility> {
        self.entries.get(position)
    }

    /// Report for a non-separator entry by id
    #[must_use]
    pub fn entry(&self, id: &EntryId) -> Option<&EntryVisibility> {
        self.entries.iter().find(|e| !e.separator && e.id == *id)
    }

    /// True if the non-separator entry `id` is shown
    #[must_use]
    pub fn is_visible(&self, id: &EntryId) -> bool {
        self.entry(id).is_some_and(|e| e.visible)
    }

    /// True if SKU `sku_index` of entry `id` is shown
    #[must_use]
    pub fn is_sku_visible(&self, id: &EntryId, sku_index: usize) -> bool {
        self.entry(id)
            .and_then(|e| e.skus.get(sku_index))
            .copied()
            .unwrap_or(false)
    }

    /// Ids of visible non-separator entries, in dataset order
    #[must_use]
    pub fn visible_ids(&self) -> Vec<&EntryId> {
        self.entries
            .iter()
            .filter(|e| !e.separator && e.visible)
            .map(|e| &e.id)
            .collect()
    }

    /// Number of visible non-separator entries
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.separator && e.visible).count()
    }

    /// Per-position reports
    pub fn iter(&self) -> impl Iterator<Item = &EntryVisibility> {
        self.entries.iter()
    }

    /// Number of reported positions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for an empty dataset
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roadmap_model::{CpuSpecRow, GpuModel, GpuSpecs};

    fn zen1() -> Entry {
        Entry::generation("zen1", "Zen", "2017")
            .with_sku(
                Sku::new("Ryzen 1000", "Ryzen 7 1700, Ryzen 5 1600")
                    .tagged("desktop")
                    .branded("Ryzen"),
            )
            .with_sku(Sku::new("Epyc 7001", "Naples").tagged("server").branded("Epyc"))
    }

    fn desktop_only() -> Entry {
        Entry::generation("zen3", "Zen 3", "2020")
            .with_sku(Sku::new("Ryzen 5000", "Vermeer").tagged("desktop").branded("Ryzen"))
    }

    fn specs() -> SpecTable {
        let mut specs = SpecTable::new();
        specs.insert("Ryzen 1000", vec![CpuSpecRow::named("Ryzen 7 1700X")]);
        specs
    }

    fn cpu(entries: &[Entry], filters: &FilterState) -> Visibility {
        let index = SearchIndex::cpu(entries, &specs());
        filters.evaluate(TechTab::Cpu, entries, &index)
    }

    #[test]
    fn empty_filters_show_every_entry_with_skus() {
        let entries = vec![Entry::separator("Zen"), zen1(), desktop_only()];
        let vis = cpu(&entries, &FilterState::new());
        assert_eq!(vis.visible_count(), 2);
        assert!(vis.get(0).unwrap().visible);
    }

    #[test]
    fn search_matches_sku_description_and_spec_models() {
        let entries = vec![zen1()];
        assert!(cpu(&entries, &FilterState::new().with_search("1700")).is_visible(&"zen1".into()));
        assert!(cpu(&entries, &FilterState::new().with_search("1700X")).is_visible(&"zen1".into()));
        assert!(!cpu(&entries, &FilterState::new().with_search("9999")).is_visible(&"zen1".into()));
    }

    #[test]
    fn search_is_case_insensitive() {
        let entries = vec![zen1()];
        let vis = cpu(&entries, &FilterState::new().with_search("NAPLES"));
        assert_eq!(vis.entry(&"zen1".into()).unwrap().skus, vec![false, true]);
    }

    #[test]
    fn segment_filter_hides_entries_without_matching_skus() {
        let entries = vec![zen1(), desktop_only()];
        let filters = FilterState::new().with_tag(LegendFacet::Segment, "server");
        let vis = cpu(&entries, &filters);

        assert!(vis.is_visible(&"zen1".into()));
        assert!(!vis.is_visible(&"zen3".into()));
        assert!(!vis.is_sku_visible(&"zen1".into(), 0));
        assert!(vis.is_sku_visible(&"zen1".into(), 1));
    }

    #[test]
    fn brand_filter_is_per_sku() {
        let entries = vec![zen1()];
        let filters = FilterState::new().with_tag(LegendFacet::Brand, "Ryzen");
        let vis = cpu(&entries, &filters);
        assert_eq!(vis.entry(&"zen1".into()).unwrap().skus, vec![true, false]);
    }

    #[test]
    fn arch_name_match_alone_does_not_show_entry() {
        // The subtitle matches but no SKU text does
        let entries = vec![zen1().with_subtitle("Summit Ridge")];
        let vis = cpu(&entries, &FilterState::new().with_search("summit"));
        assert!(!vis.is_visible(&"zen1".into()));
    }

    #[test]
    fn entries_without_skus_are_hidden_in_cpu_mode() {
        let entries = vec![Entry::generation("bare", "Bare", "2030")];
        assert!(!cpu(&entries, &FilterState::new()).is_visible(&"bare".into()));
    }

    #[test]
    fn separators_follow_their_section() {
        let entries = vec![
            Entry::separator("Server"),
            Entry::generation("srv", "Srv", "2019")
                .with_sku(Sku::new("Epyc", "").tagged("server")),
            Entry::separator("Client"),
            desktop_only(),
            Entry::separator("Empty"),
        ];
        let vis = cpu(&entries, &FilterState::new().with_tag(LegendFacet::Segment, "server"));
        let flags: Vec<bool> = vis.iter().map(|e| e.visible).collect();
        assert_eq!(flags, vec![true, true, false, false, false]);
    }

    #[test]
    fn segment_buttons_are_exclusive_and_all_clears() {
        let mut filters = FilterState::new();
        filters.select_segment("desktop");
        filters.select_segment("server");
        assert_eq!(filters.segment_tags().iter().collect::<Vec<_>>(), vec!["server"]);
        filters.select_segment("all");
        assert!(filters.segment_tags().is_empty());
    }

    #[test]
    fn legend_toggle_flips_membership() {
        let mut filters = FilterState::new();
        assert!(filters.toggle_legend(LegendFacet::Brand, "Epyc"));
        assert!(!filters.toggle_legend(LegendFacet::Brand, "Epyc"));
        assert!(filters.is_empty());
    }

    fn mi300() -> Entry {
        Entry::generation("cdna3", "CDNA 3", "2023").with_gpu_specs(GpuSpecs {
            family: "Instinct MI300".to_string(),
            segment: Some("datacenter".to_string()),
            models: vec![
                GpuModel::new("MI300X").with_form("OAM").with_field("mem", "192 GB"),
                GpuModel::new("MI300A").with_form("APU / OAM"),
            ],
            ..GpuSpecs::default()
        })
    }

    fn rdna3() -> Entry {
        Entry::generation("rdna3", "RDNA 3", "2022").with_gpu_specs(GpuSpecs {
            family: "Radeon RX 7000".to_string(),
            segment: Some("consumer".to_string()),
            consumer: true,
            models: vec![GpuModel::new("RX 7900 XTX").with_form("PCIe").with_field("cu", 96)],
            ..GpuSpecs::default()
        })
    }

    fn gpu(entries: &[Entry], filters: &FilterState) -> Visibility {
        filters.evaluate(TechTab::Gpu, entries, &SearchIndex::gpu(entries))
    }

    #[test]
    fn gpu_segment_and_form_filters() {
        let entries = vec![mi300(), rdna3()];

        let vis = gpu(&entries, &FilterState::new().with_gpu_segment(GpuSegment::Consumer));
        assert_eq!(vis.visible_ids(), vec![&EntryId::from("rdna3")]);

        let vis = gpu(&entries, &FilterState::new().with_gpu_form(FormFactor::Oam));
        assert_eq!(vis.visible_ids(), vec![&EntryId::from("cdna3")]);
    }

    #[test]
    fn gpu_search_uses_layout_fields() {
        let entries = vec![mi300(), rdna3()];
        assert_eq!(
            gpu(&entries, &FilterState::new().with_search("192 gb")).visible_ids(),
            vec![&EntryId::from("cdna3")]
        );
        assert_eq!(
            gpu(&entries, &FilterState::new().with_search("xtx 96")).visible_ids(),
            vec![&EntryId::from("rdna3")]
        );
    }

    #[test]
    fn gpu_form_toggles_back_to_all() {
        let mut filters = FilterState::new();
        filters.toggle_gpu_form(FormFactor::Pcie);
        filters.toggle_gpu_form(FormFactor::Oam);
        assert_eq!(filters.gpu_form_factor(), Some(FormFactor::Oam));
        filters.toggle_gpu_form(FormFactor::Oam);
        assert_eq!(filters.gpu_form_factor(), None);
    }

    #[test]
    fn set_search_reports_change() {
        let mut filters = FilterState::new();
        assert!(filters.set_search("Ryzen"));
        assert!(!filters.set_search("RYZEN"));
        assert_eq!(filters.search_term(), "ryzen");
    }

    mod laws {
        use super::*;
        use proptest::prelude::*;

        const SEGMENTS: &[&str] = &["desktop", "laptop", "server", "handheld"];
        const BRANDS: &[&str] = &["Ryzen", "Epyc", "Athlon"];

        fn sku_strategy() -> impl Strategy<Value = Sku> {
            (
                "[a-z0-9 ]{1,8}",
                prop::sample::subsequence(SEGMENTS, 0..=2),
                prop::option::of(prop::sample::select(BRANDS)),
            )
                .prop_map(|(name, tags, brand)| {
                    let mut sku = Sku::new(name, "");
                    for tag in tags {
                        sku = sku.tagged(tag);
                    }
                    if let Some(brand) = brand {
                        sku = sku.branded(brand);
                    }
                    sku
                })
        }

        fn dataset_strategy() -> impl Strategy<Value = Vec<Entry>> {
            prop::collection::vec(
                prop_oneof![
                    1 => Just(None),
                    4 => prop::collection::vec(sku_strategy(), 0..4).prop_map(Some),
                ],
                0..8,
            )
            .prop_map(|slots| {
                slots
                    .into_iter()
                    .enumerate()
                    .map(|(i, skus)| match skus {
                        None => Entry::separator(format!("era {i}")),
                        Some(skus) => skus
                            .into_iter()
                            .fold(Entry::generation(format!("e{i}"), format!("Arch {i}"), "2020"), Entry::with_sku),
                    })
                    .collect()
            })
        }

        fn filter_strategy() -> impl Strategy<Value = FilterState> {
            (
                prop::sample::subsequence(SEGMENTS, 0..=2),
                prop::sample::subsequence(BRANDS, 0..=2),
                "[a-z0-9]{0,3}",
            )
                .prop_map(|(segments, brands, search)| {
                    let mut filters = FilterState::new().with_search(&search);
                    for tag in segments {
                        filters = filters.with_tag(LegendFacet::Segment, tag);
                    }
                    for tag in brands {
                        filters = filters.with_tag(LegendFacet::Brand, tag);
                    }
                    filters
                })
        }

        fn visible_set(vis: &Visibility) -> BTreeSet<usize> {
            vis.iter()
                .enumerate()
                .filter(|(_, e)| e.visible)
                .map(|(i, _)| i)
                .collect()
        }

        proptest! {
            #[test]
            fn prop_evaluation_is_pure(entries in dataset_strategy(), filters in filter_strategy()) {
                let index = SearchIndex::cpu(&entries, &SpecTable::new());
                let first = filters.evaluate(TechTab::Cpu, &entries, &index);
                let second = filters.evaluate(TechTab::Cpu, &entries, &index);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn prop_segment_constraint_never_widens(
                entries in dataset_strategy(),
                segments in prop::sample::subsequence(SEGMENTS, 1..=3),
            ) {
                let index = SearchIndex::cpu(&entries, &SpecTable::new());
                let open = visible_set(&FilterState::new().evaluate(TechTab::Cpu, &entries, &index));
                let constrained = segments
                    .into_iter()
                    .fold(FilterState::new(), |f, tag| f.with_tag(LegendFacet::Segment, tag));
                let narrowed = visible_set(&constrained.evaluate(TechTab::Cpu, &entries, &index));
                prop_assert!(narrowed.is_subset(&open));
            }

            #[test]
            fn prop_constraint_on_another_facet_never_widens(
                entries in dataset_strategy(),
                base in filter_strategy(),
                brand in prop::sample::select(BRANDS),
                search in "[a-z0-9]{1,3}",
            ) {
                let index = SearchIndex::cpu(&entries, &SpecTable::new());
                let before = visible_set(&base.evaluate(TechTab::Cpu, &entries, &index));

                if base.brand_tags().is_empty() {
                    let with_brand = base.clone().with_tag(LegendFacet::Brand, brand);
                    let after = visible_set(&with_brand.evaluate(TechTab::Cpu, &entries, &index));
                    prop_assert!(after.is_subset(&before));
                }
                if base.search_term().is_empty() {
                    let with_search = base.clone().with_search(&search);
                    let after = visible_set(&with_search.evaluate(TechTab::Cpu, &entries, &index));
                    prop_assert!(after.is_subset(&before));
                }
            }
        }
    }
}
