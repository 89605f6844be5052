//! Filter buttons and legend state for the presenter

use crate::filter::{FilterState, LegendFacet};
use roadmap_model::{FormFactor, GpuSegment, TechTab, VendorConfig};

/// Facet a button or legend item controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    /// CPU market segment
    Segment,
    /// CPU brand
    Brand,
    /// GPU market segment
    GpuSegment,
    /// GPU form factor
    GpuForm,
}

impl From<LegendFacet> for FacetKind {
    fn from(facet: LegendFacet) -> Self {
        match facet {
            LegendFacet::Segment => Self::Segment,
            LegendFacet::Brand => Self::Brand,
        }
    }
}

/// One filter button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetButton {
    /// Facet controlled
    pub kind: FacetKind,
    /// Filter value (`all` for the reset button)
    pub value: String,
    /// Button text
    pub label: String,
    /// Highlighted
    pub active: bool,
}

/// One legend item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendItem {
    /// Facet controlled
    pub kind: FacetKind,
    /// Tag value
    pub tag: String,
    /// Legend text
    pub label: String,
    /// Dot color
    pub color: String,
    /// Tag is selected
    pub active: bool,
    /// Other tags of the same legend are selected but not this one
    pub dimmed: bool,
}

/// Buttons and legend for the current vendor and tab
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetPanel {
    /// Filter buttons, in display order
    pub buttons: Vec<FacetButton>,
    /// Legend items, in display order
    pub legend: Vec<LegendItem>,
}

impl FacetPanel {
    /// Derive the panel from the filter state
    #[must_use]
    pub fn build(config: &VendorConfig, tech: TechTab, filters: &FilterState) -> Self {
        match tech {
            TechTab::Cpu => Self::cpu(config, filters),
            TechTab::Gpu => Self::gpu(filters),
        }
    }

    fn cpu(config: &VendorConfig, filters: &FilterState) -> Self {
        let segments = filters.segment_tags();
        let buttons = config
            .filter_buttons
            .iter()
            .map(|value| {
                let active = if *value == "all" {
                    segments.is_empty()
                } else {
                    segments.len() == 1 && segments.contains(*value)
                };
                FacetButton {
                    kind: FacetKind::Segment,
                    value: (*value).to_string(),
                    label: capitalize(value),
                    active,
                }
            })
            .collect();

        let legend_group = |facet: LegendFacet, defs: &[roadmap_model::TagDef]| {
            let active_tags = filters.tags(facet);
            defs.iter()
                .map(|def| {
                    let active = active_tags.contains(def.tag);
                    LegendItem {
                        kind: facet.into(),
                        tag: def.tag.to_string(),
                        label: def.label.to_string(),
                        color: def.color.to_string(),
                        active,
                        dimmed: !active_tags.is_empty() && !active,
                    }
                })
                .collect::<Vec<_>>()
        };

        let mut legend = legend_group(LegendFacet::Segment, config.segment_tags);
        legend.extend(legend_group(LegendFacet::Brand, config.brand_tags));

        Self { buttons, legend }
    }

    fn gpu(filters: &FilterState) -> Self {
        let selected_segment = filters.gpu_segment();
        let selected_form = filters.gpu_form_factor();

        let mut buttons = vec![FacetButton {
            kind: FacetKind::GpuSegment,
            value: "all".to_string(),
            label: "All".to_string(),
            active: selected_segment.is_none(),
        }];
        buttons.extend(GpuSegment::ALL.iter().map(|segment| FacetButton {
            kind: FacetKind::GpuSegment,
            value: segment.as_str().to_string(),
            label: segment.label().to_string(),
            active: selected_segment == Some(*segment),
        }));
        buttons.extend(FormFactor::ALL.iter().map(|form| FacetButton {
            kind: FacetKind::GpuForm,
            value: form.as_str().to_string(),
            label: form.label().to_string(),
            active: selected_form == Some(*form),
        }));

        let segment_items = VendorConfig::gpu_segment_tags().iter().map(|def| LegendItem {
            kind: FacetKind::GpuSegment,
            tag: def.tag.to_string(),
            label: def.label.to_string(),
            color: def.color.to_string(),
            active: selected_segment.is_some_and(|s| s.as_str() == def.tag),
            dimmed: false,
        });
        let form_items = VendorConfig::gpu_form_tags().iter().map(|def| LegendItem {
            kind: FacetKind::GpuForm,
            tag: def.tag.to_string(),
            label: def.label.to_string(),
            color: def.color.to_string(),
            active: selected_form.is_some_and(|f| f.as_str() == def.tag),
            dimmed: false,
        });

        Self {
            buttons,
            legend: segment_items.chain(form_items).collect(),
        }
    }

    /// Button for a facet value
    #[must_use]
    pub fn button(&self, kind: FacetKind, value: &str) -> Option<&FacetButton> {
        self.buttons
            .iter()
            .find(|b| b.kind == kind && b.value == value)
    }

    /// Legend item for a facet tag
    #[must_use]
    pub fn legend_item(&self, kind: FacetKind, tag: &str) -> Option<&LegendItem> {
        self.legend.iter().find(|l| l.kind == kind && l.tag == tag)
    }

    /// Values of the highlighted buttons
    #[must_use]
    pub fn active_buttons(&self) -> Vec<&str> {
        self.buttons
            .iter()
            .filter(|b| b.active)
            .map(|b| b.value.as_str())
            .collect()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
