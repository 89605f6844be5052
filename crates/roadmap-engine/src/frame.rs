//! Full render projection handed to the presenter on structural changes
//!
//! A [`Frame`] is built from the dataset, the view state and persisted
//! annotations. It never looks at the previous frame, so rebuilding it with
//! the same inputs gives the same output.

use crate::facets::FacetPanel;
use crate::view::ViewState;
use roadmap_model::{
    CodenameRow, CpuSpecRow, Entry, EntryId, GpuModel, GpuSegment, GpuTableLayout, LinkRecord,
    SegmentBadge, SpecTable, SpecTableLayout, TechTab, Vendor, VendorConfig,
};
use roadmap_store::PersistenceLayer;
use std::collections::BTreeSet;

/// Page header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Theming class
    pub class: &'static str,
    /// Title text
    pub title: &'static str,
    /// Subtitle text
    pub subtitle: &'static str,
}

impl Header {
    /// Header for a vendor and tab
    #[must_use]
    pub fn for_tab(config: &VendorConfig, tech: TechTab) -> Self {
        match (tech, config.gpu) {
            (TechTab::Gpu, Some(gpu)) => Self {
                class: config.header_class,
                title: gpu.title,
                subtitle: gpu.subtitle,
            },
            _ => Self {
                class: config.header_class,
                title: config.title,
                subtitle: config.subtitle,
            },
        }
    }
}

/// Header badge of a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// CPU client/server badge
    Cpu(SegmentBadge),
    /// GPU market segment
    Gpu(GpuSegment),
}

/// One SKU row in an expanded CPU generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuView {
    /// Product line name
    pub name: String,
    /// Short description
    pub desc: String,
    /// Segment tags
    pub tags: Vec<String>,
    /// Brand, if any
    pub brand: Option<String>,
    /// Detailed spec rows; empty when the SKU has no drill-down
    pub specs: Vec<CpuSpecRow>,
    /// Spec table columns, present when `specs` is not empty
    pub spec_layout: Option<SpecTableLayout>,
}

impl SkuView {
    /// True if the SKU can open a spec panel
    #[inline]
    #[must_use]
    pub fn has_details(&self) -> bool {
        !self.specs.is_empty()
    }
}

/// GPU family table
#[derive(Debug, Clone, PartialEq)]
pub struct GpuView {
    /// Family name
    pub family: String,
    /// Family description
    pub desc: String,
    /// Column layout
    pub layout: GpuTableLayout,
    /// Model rows
    pub models: Vec<GpuModel>,
}

/// A product generation as the presenter draws it
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationView {
    /// Anchor and persistence key
    pub id: EntryId,
    /// Architecture name
    pub arch: String,
    /// Year label
    pub year: String,
    /// Accent color
    pub color: String,
    /// Codename summary
    pub subtitle: Option<String>,
    /// Announced but not shipped
    pub unreleased: bool,
    /// Body is shown
    pub expanded: bool,
    /// Header badge
    pub badge: Badge,
    /// CPU product lines (empty on the GPU tab)
    pub skus: Vec<SkuView>,
    /// GPU family table (GPU tab only)
    pub gpu: Option<GpuView>,
    /// Saved notes
    pub notes: String,
    /// Saved or default links
    pub links: Vec<LinkRecord>,
    /// Add-link form is open
    pub link_form_open: bool,
    /// A spec panel is open, so the collapse button shows
    pub has_open_details: bool,
}

/// One position on the timeline
#[derive(Debug, Clone, PartialEq)]
pub enum EntryView {
    /// Era boundary
    Separator {
        /// Era label
        era: String,
    },
    /// Product generation
    Generation(Box<GenerationView>),
}

impl EntryView {
    /// Generation view, if this is not a separator
    #[must_use]
    pub fn generation(&self) -> Option<&GenerationView> {
        match self {
            EntryView::Generation(view) => Some(view.as_ref()),
            EntryView::Separator { .. } => None,
        }
    }
}

/// Inputs to [`Frame::build`]
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Active vendor config
    pub config: &'a VendorConfig,
    /// GPU tab can be selected
    pub gpu_available: bool,
    /// Active dataset
    pub entries: &'a [Entry],
    /// CPU spec table of the vendor
    pub specs: &'a SpecTable,
    /// Current selections
    pub view: &'a ViewState,
    /// Notes and links
    pub persistence: &'a PersistenceLayer,
    /// Entries with an open add-link form
    pub link_forms: &'a BTreeSet<EntryId>,
}

/// Everything the presenter needs to draw the page
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Active vendor
    pub vendor: Vendor,
    /// Active tab
    pub tech: TechTab,
    /// Page header
    pub header: Header,
    /// CPU/GPU tab switcher is shown
    pub tech_tabs_visible: bool,
    /// Filter buttons and legend
    pub facets: FacetPanel,
    /// Codename quick reference (CPU tab only)
    pub codename_table: &'static [CodenameRow],
    /// One view per dataset position
    pub entries: Vec<EntryView>,
}

impl Frame {
    /// Project the current state into a frame
    #[must_use]
    pub fn build(ctx: &FrameContext<'_>) -> Self {
        let view = ctx.view;
        let tech = view.tech();
        let codename_table = match tech {
            TechTab::Cpu => ctx.config.codename_table,
            TechTab::Gpu => &[],
        };

        Self {
            vendor: view.vendor(),
            tech,
            header: Header::for_tab(ctx.config, tech),
            tech_tabs_visible: ctx.gpu_available,
            facets: FacetPanel::build(ctx.config, tech, view.filters()),
            codename_table,
            entries: ctx.entries.iter().map(|entry| Self::entry_view(ctx, entry)).collect(),
        }
    }

    fn entry_view(ctx: &FrameContext<'_>, entry: &Entry) -> EntryView {
        if let Some(era) = &entry.era {
            return EntryView::Separator { era: era.clone() };
        }

        let view = ctx.view;
        let vendor = view.vendor();
        let (badge, skus, gpu): (Badge, Vec<SkuView>, Option<GpuView>) = match view.tech() {
            TechTab::Cpu => (
                Badge::Cpu(entry.segment_badge()),
                entry.skus.iter().map(|sku| {
                    let specs = ctx.specs.rows(&sku.name).unwrap_or(&[]).to_vec();
                    let spec_layout = (!specs.is_empty()).then(|| SpecTableLayout::of(&specs));
                    SkuView {
                        name: sku.name.clone(),
                        desc: sku.desc.clone(),
                        tags: sku.tags.clone(),
                        brand: sku.brand.clone(),
                        specs,
                        spec_layout,
                    }
                })
                .collect(),
                None,
            ),
            TechTab::Gpu => (
                Badge::Gpu(entry.gpu_segment()),
                Vec::new(),
                entry.gpu_specs.as_ref().map(|specs| GpuView {
                    family: specs.family.clone(),
                    desc: specs.desc.clone(),
                    layout: specs.layout(),
                    models: specs.models.clone(),
                }),
            ),
        };

        EntryView::Generation(Box::new(GenerationView {
            id: entry.id.clone(),
            arch: entry.arch.clone(),
            year: entry.year.clone(),
            color: entry.color.clone(),
            subtitle: entry.subtitle.clone(),
            unreleased: entry.unreleased,
            expanded: view.is_expanded(&entry.id),
            badge,
            skus,
            gpu,
            notes: ctx.persistence.load_notes(vendor, &entry.id),
            links: ctx.persistence.get_links(vendor, entry),
            link_form_open: ctx.link_forms.contains(&entry.id),
            has_open_details: view.details().has_open(&entry.id),
        }))
    }

    /// Generation view by id
    #[must_use]
    pub fn generation(&self, id: &EntryId) -> Option<&GenerationView> {
        self.entries
            .iter()
            .filter_map(EntryView::generation)
            .find(|g| g.id == *id)
    }

    /// Ids of every generation, in timeline order
    #[must_use]
    pub fn generation_ids(&self) -> Vec<&EntryId> {
        self.entries
            .iter()
            .filter_map(EntryView::generation)
            .map(|g| &g.id)
            .collect()
    }
}
