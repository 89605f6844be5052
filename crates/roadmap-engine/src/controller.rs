//! Render controller: owns the view state and drives the presenter
//!
//! Structural changes (vendor or tab switch, expand/collapse all, jumps and
//! link edits) rebuild the whole [`Frame`]. Everything else recomputes
//! visibility or detail state and sends an incremental update.

use crate::action::Action;
use crate::config::ViewerConfig;
use crate::debounce::SearchDebouncer;
use crate::detail::{DetailView, RowKey};
use crate::error::EngineError;
use crate::facets::FacetPanel;
use crate::filter::{LegendFacet, SearchIndex, Visibility};
use crate::frame::{Frame, FrameContext};
use crate::presenter::Presenter;
use crate::view::ViewState;
use roadmap_model::{
    Entry, EntryId, FormFactor, GpuSegment, LinkRecord, SpecTable, TechTab, Vendor, VendorConfig,
};
use roadmap_store::{DataStore, DatasetKey, PersistenceLayer};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Message shown when the startup dataset cannot be loaded
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load data. Please refresh the page.";

/// Owns all viewer state and turns actions into presenter calls
#[derive(Debug)]
pub struct RenderController<P: Presenter> {
    config: ViewerConfig,
    store: DataStore,
    persistence: PersistenceLayer,
    presenter: P,
    view: ViewState,
    vendor_config: VendorConfig,
    cpu: Arc<Vec<Entry>>,
    gpu: Arc<Vec<Entry>>,
    specs: Arc<SpecTable>,
    index: SearchIndex,
    visibility: Visibility,
    link_forms: BTreeSet<EntryId>,
    debouncer: SearchDebouncer,
}

impl<P: Presenter> RenderController<P> {
    /// Create controller over explicit store and persistence
    ///
    /// Nothing is loaded until [`start`](Self::start) or
    /// [`switch_vendor`](Self::switch_vendor).
    pub fn new(
        config: ViewerConfig,
        store: DataStore,
        persistence: PersistenceLayer,
        presenter: P,
    ) -> Self {
        let vendor = config.startup_vendor;
        let debouncer = SearchDebouncer::new(config.search_debounce());
        Self {
            config,
            store,
            persistence,
            presenter,
            view: ViewState::new(vendor),
            vendor_config: VendorConfig::builtin(vendor),
            cpu: Arc::default(),
            gpu: Arc::default(),
            specs: Arc::default(),
            index: SearchIndex::default(),
            visibility: Visibility::default(),
            link_forms: BTreeSet::new(),
            debouncer,
        }
    }

    /// Create controller with store and persistence built from config
    pub fn from_config(config: ViewerConfig, presenter: P) -> Self {
        let store = config.data_store();
        let persistence = config.persistence();
        Self::new(config, store, persistence, presenter)
    }

    /// Load and render the configured startup vendor
    ///
    /// # Errors
    /// `EngineError::StartupLoad` if the primary dataset cannot be fetched
    /// or decoded; the presenter is shown a failure message first
    pub async fn start(&mut self) -> Result<(), EngineError> {
        let vendor = self.config.startup_vendor;
        self.enter_vendor(vendor);
        self.presenter.show_loading();
        if let Err(e) = self.store.try_load(DatasetKey::Roadmap(vendor)).await {
            error!(vendor = %vendor, error = %e, "startup data load failed");
            self.presenter.show_load_failure(LOAD_FAILURE_MESSAGE);
            return Err(EngineError::StartupLoad(e));
        }
        self.load_vendor(vendor).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Presenter
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable presenter
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Current view state
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Last computed visibility
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Config of the active vendor
    pub fn vendor_config(&self) -> &VendorConfig {
        &self.vendor_config
    }

    /// Dataset store
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Notes and links
    pub fn persistence(&self) -> &PersistenceLayer {
        &self.persistence
    }

    /// Dataset driving the active tab
    pub fn entries(&self) -> &[Entry] {
        match self.view.tech() {
            TechTab::Cpu => &self.cpu,
            TechTab::Gpu => &self.gpu,
        }
    }

    /// True if the GPU tab can be selected
    pub fn gpu_available(&self) -> bool {
        self.vendor_config.has_gpu() && !self.gpu.is_empty()
    }

    /// True while a search term waits for its debounce deadline
    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Current frame projection
    pub fn frame(&self) -> Frame {
        Frame::build(&FrameContext {
            config: &self.vendor_config,
            gpu_available: self.gpu_available(),
            entries: self.entries(),
            specs: &self.specs,
            view: &self.view,
            persistence: &self.persistence,
            link_forms: &self.link_forms,
        })
    }

    /// Current detail state, including search highlights
    pub fn detail_view(&self) -> DetailView {
        let matches = match self.view.tech() {
            TechTab::Cpu => self.view.details().search_matches(
                &self.cpu,
                &self.specs,
                self.view.filters().search_term(),
            ),
            TechTab::Gpu => BTreeSet::new(),
        };
        self.view.details().view(matches)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn active(&self) -> Arc<Vec<Entry>> {
        match self.view.tech() {
            TechTab::Cpu => Arc::clone(&self.cpu),
            TechTab::Gpu => Arc::clone(&self.gpu),
        }
    }

    fn find<'a>(entries: &'a [Entry], id: &EntryId) -> Result<&'a Entry, EngineError> {
        entries
            .iter()
            .find(|e| !e.is_separator() && e.id == *id)
            .ok_or_else(|| EngineError::UnknownEntry(id.clone()))
    }

    fn rebuild_index(&mut self) {
        self.index = SearchIndex::build(self.view.tech(), self.entries(), &self.specs);
    }

    fn recompute_visibility(&mut self) {
        let entries = self.active();
        self.visibility = self
            .view
            .filters()
            .evaluate(self.view.tech(), &entries, &self.index);
        let closed = self.view.details_mut().close_hidden(&entries, &self.visibility);
        debug!(
            visible = self.visibility.visible_count(),
            total = entries.len(),
            closed_panels = closed.len(),
            "visibility recomputed"
        );
    }

    fn render(&mut self) {
        self.recompute_visibility();
        let frame = self.frame();
        let details = self.detail_view();
        self.presenter.render(&frame, &self.visibility, &details);
    }

    fn refilter(&mut self) {
        self.recompute_visibility();
        let facets = FacetPanel::build(&self.vendor_config, self.view.tech(), self.view.filters());
        let details = self.detail_view();
        self.presenter.update_facets(&facets);
        self.presenter.update_visibility(&self.visibility, &details);
    }

    fn push_details(&mut self) {
        let details = self.detail_view();
        self.presenter.update_details(&details);
    }

    fn leave_dataset(&mut self) {
        self.link_forms.clear();
        self.debouncer.cancel();
    }

    // ------------------------------------------------------------------
    // Vendor and tab
    // ------------------------------------------------------------------

    /// Switch vendor: reset state, load its datasets and render
    ///
    /// Loads run concurrently; failed loads come back empty.
    pub async fn switch_vendor(&mut self, vendor: Vendor) {
        self.enter_vendor(vendor);
        self.presenter.show_loading();
        self.load_vendor(vendor).await;
    }

    fn enter_vendor(&mut self, vendor: Vendor) {
        self.view.switch_vendor(vendor);
        self.vendor_config = VendorConfig::builtin(vendor);
        self.leave_dataset();
    }

    async fn load_vendor(&mut self, vendor: Vendor) {
        let has_gpu = self.vendor_config.has_gpu();
        let store = &self.store;
        let gpu = async move {
            if has_gpu {
                store.load(DatasetKey::Gpu(vendor)).await
            } else {
                Arc::default()
            }
        };
        let (cpu, gpu, specs) = futures::join!(
            store.load(DatasetKey::Roadmap(vendor)),
            gpu,
            store.load_specs(vendor)
        );
        self.cpu = cpu;
        self.gpu = gpu;
        self.specs = specs;

        info!(
            vendor = %vendor,
            cpu_entries = self.cpu.len(),
            gpu_entries = self.gpu.len(),
            spec_tables = self.specs.len(),
            "switched vendor"
        );
        self.rebuild_index();
        self.render();
    }

    /// Switch tab; returns whether anything changed
    ///
    /// Asking for the current tab, or for GPU when it is unavailable, does
    /// nothing.
    pub fn switch_tech(&mut self, tech: TechTab) -> bool {
        let gpu_available = self.gpu_available();
        if !self.view.switch_tech(tech, gpu_available) {
            return false;
        }
        self.leave_dataset();
        info!(vendor = %self.view.vendor(), tech = %tech, "switched tab");
        self.rebuild_index();
        self.render();
        true
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    /// Flip one entry's expansion; returns whether it is now expanded
    ///
    /// # Errors
    /// `EngineError::UnknownEntry` if the id is not in the active dataset
    pub fn toggle_expand(&mut self, id: &EntryId) -> Result<bool, EngineError> {
        Self::find(self.entries(), id)?;
        let expanded = self.view.toggle_expand(id);
        self.presenter.set_expanded(id, expanded);
        Ok(expanded)
    }

    /// Expand every generation of the active dataset
    pub fn expand_all(&mut self) {
        let entries = self.active();
        self.view
            .expand_all(entries.iter().filter(|e| !e.is_separator()).map(|e| &e.id));
        self.render();
    }

    /// Collapse every generation
    pub fn collapse_all(&mut self) {
        self.view.collapse_all();
        self.render();
    }

    /// Expand an entry, render, then scroll to it
    ///
    /// # Errors
    /// `EngineError::UnknownEntry` if the id is not in the active dataset
    pub fn jump_to(&mut self, id: &EntryId) -> Result<(), EngineError> {
        Self::find(self.entries(), id)?;
        self.view.expand(id);
        self.render();
        self.presenter.scroll_into_view(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Filters and search
    // ------------------------------------------------------------------

    /// Segment button
    pub fn select_segment(&mut self, filter: &str) {
        self.view.filters_mut().select_segment(filter);
        self.refilter();
    }

    /// Legend item; returns whether the tag is now active
    pub fn toggle_legend(&mut self, facet: LegendFacet, tag: &str) -> bool {
        let active = self.view.filters_mut().toggle_legend(facet, tag);
        self.refilter();
        active
    }

    /// GPU segment button; `None` is all
    pub fn select_gpu_segment(&mut self, segment: Option<GpuSegment>) {
        self.view.filters_mut().select_gpu_segment(segment);
        self.refilter();
    }

    /// GPU form factor button
    pub fn toggle_gpu_form(&mut self, form: FormFactor) {
        self.view.filters_mut().toggle_gpu_form(form);
        self.refilter();
    }

    /// Keystroke in the search box; applied once input settles
    pub fn search_input(&mut self, term: impl Into<String>) {
        self.debouncer.push(term, Instant::now());
    }

    /// Apply the pending term if its deadline has passed; returns whether
    /// visibility changed
    pub fn apply_due_search(&mut self) -> bool {
        match self.debouncer.take_due(Instant::now()) {
            Some(term) => self.apply_search(&term),
            None => false,
        }
    }

    /// Wait for the pending term to settle and apply it
    pub async fn settle_search(&mut self) -> bool {
        match self.debouncer.settled().await {
            Some(term) => self.apply_search(&term),
            None => false,
        }
    }

    /// Apply the pending term without waiting
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.take() {
            Some(term) => self.apply_search(&term),
            None => false,
        }
    }

    /// Clear the search immediately, dropping any pending term
    pub fn clear_search(&mut self) -> bool {
        self.debouncer.cancel();
        self.apply_search("")
    }

    fn apply_search(&mut self, term: &str) -> bool {
        if !self.view.filters_mut().set_search(term) {
            return false;
        }
        debug!(term = %self.view.filters().search_term(), "search applied");
        self.refilter();
        true
    }

    // ------------------------------------------------------------------
    // Detail panels
    // ------------------------------------------------------------------

    /// SKU click: open its spec panel, or close it if open
    ///
    /// Returns whether the panel is now open. SKUs without spec rows have
    /// no panel and are left alone.
    ///
    /// # Errors
    /// `EngineError::UnknownEntry` or `EngineError::UnknownSku` if the SKU is
    /// not in the active dataset
    pub fn toggle_sku_details(&mut self, entry: &EntryId, sku: &str) -> Result<bool, EngineError> {
        let found = Self::find(self.entries(), entry)?;
        if !found.skus.iter().any(|s| s.name == sku) {
            return Err(EngineError::unknown_sku(entry, sku));
        }
        if self.specs.rows(sku).is_none() {
            return Ok(false);
        }
        let open = self.view.details_mut().toggle_sku(entry, sku);
        self.push_details();
        Ok(open)
    }

    /// Close an entry's open spec panel; returns whether one was open
    pub fn collapse_details(&mut self, entry: &EntryId) -> bool {
        let closed = self.view.details_mut().collapse(entry);
        if closed {
            self.push_details();
        }
        closed
    }

    /// Spec row click; returns whether the row is now selected
    pub fn select_row(&mut self, key: RowKey, additive: bool) -> bool {
        let selected = self.view.details_mut().select_row(key, additive);
        self.push_details();
        selected
    }

    /// Drop every row selection
    pub fn clear_selections(&mut self) {
        self.view.details_mut().clear_selections();
        self.push_details();
    }

    // ------------------------------------------------------------------
    // Notes and links
    // ------------------------------------------------------------------

    /// Save an entry's notes
    ///
    /// # Errors
    /// `EngineError::UnknownEntry` if the id is not in the active dataset
    pub fn edit_notes(&mut self, entry: &EntryId, text: &str) -> Result<(), EngineError> {
        Self::find(self.entries(), entry)?;
        self.persistence.save_notes(self.view.vendor(), entry, text);
        Ok(())
    }

    /// Open the add-link form
    pub fn show_link_form(&mut self, entry: &EntryId) {
        self.link_forms.insert(entry.clone());
        self.presenter.show_link_form(entry, true);
    }

    /// Close the add-link form
    pub fn hide_link_form(&mut self, entry: &EntryId) {
        self.link_forms.remove(entry);
        self.presenter.show_link_form(entry, false);
    }

    /// Submit the add-link form and return the entry's new links
    ///
    /// On success the form closes and the entry is rendered expanded. On
    /// rejected input nothing changes and the form stays open.
    ///
    /// # Errors
    /// `EngineError::LinkInput` for a blank URL, `EngineError::UnknownEntry`
    /// if the id is not in the active dataset
    pub fn add_link(
        &mut self,
        entry: &EntryId,
        label: &str,
        url: &str,
    ) -> Result<Vec<LinkRecord>, EngineError> {
        let entries = self.active();
        let found = Self::find(&entries, entry)?;
        let links = self
            .persistence
            .add_link(self.view.vendor(), found, label, url)?;
        self.link_forms.remove(entry);
        self.view.expand(entry);
        self.render();
        Ok(links)
    }

    /// Delete a link and return the entry's remaining links
    ///
    /// # Errors
    /// `EngineError::UnknownEntry` if the id is not in the active dataset
    pub fn remove_link(&mut self, entry: &EntryId, index: usize) -> Result<Vec<LinkRecord>, EngineError> {
        let entries = self.active();
        let found = Self::find(&entries, entry)?;
        let links = self.persistence.remove_link(self.view.vendor(), found, index);
        self.view.expand(entry);
        self.render();
        Ok(links)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Route an action to its handler
    ///
    /// # Errors
    /// Whatever the handler returns; actions with no failure mode always
    /// succeed
    pub async fn dispatch(&mut self, action: Action) -> Result<(), EngineError> {
        match action {
            Action::SwitchVendor(vendor) => self.switch_vendor(vendor).await,
            Action::SwitchTech(tech) => {
                self.switch_tech(tech);
            }
            Action::ToggleExpand(id) => {
                self.toggle_expand(&id)?;
            }
            Action::ExpandAll => self.expand_all(),
            Action::CollapseAll => self.collapse_all(),
            Action::JumpTo(id) => self.jump_to(&id)?,
            Action::SelectSegment(filter) => self.select_segment(&filter),
            Action::ToggleLegend(facet, tag) => {
                self.toggle_legend(facet, &tag);
            }
            Action::SelectGpuSegment(segment) => self.select_gpu_segment(segment),
            Action::ToggleGpuForm(form) => self.toggle_gpu_form(form),
            Action::SearchInput(term) => self.search_input(term),
            Action::ClearSearch => {
                self.clear_search();
            }
            Action::FlushSearch => {
                self.flush_search();
            }
            Action::ToggleSkuDetails { entry, sku } => {
                self.toggle_sku_details(&entry, &sku)?;
            }
            Action::CollapseDetails(entry) => {
                self.collapse_details(&entry);
            }
            Action::SelectRow { key, additive } => {
                self.select_row(key, additive);
            }
            Action::ClearSelections => self.clear_selections(),
            Action::EditNotes { entry, text } => self.edit_notes(&entry, &text)?,
            Action::ShowLinkForm(entry) => self.show_link_form(&entry),
            Action::HideLinkForm(entry) => self.hide_link_form(&entry),
            Action::AddLink { entry, label, url } => {
                self.add_link(&entry, &label, &url)?;
            }
            Action::RemoveLink { entry, index } => {
                self.remove_link(&entry, index)?;
            }
        }
        Ok(())
    }
}
