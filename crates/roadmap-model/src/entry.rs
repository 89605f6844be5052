//! Timeline entries: CPU generations, GPU families and era separators

use crate::error::ModelError;
use crate::ids::EntryId;
use crate::link::LinkRecord;
use crate::text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One product generation on the timeline, or an era separator
///
/// Every field defaults when absent from the dataset. An entry with `era`
/// set is a separator and carries no SKU or GPU data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    /// Stable unique key
    pub id: EntryId,
    /// Architecture name
    #[serde(deserialize_with = "text::lenient")]
    pub arch: String,
    /// Release year label
    #[serde(deserialize_with = "text::lenient")]
    pub year: String,
    /// Accent color
    pub color: String,
    /// Optional codename summary
    #[serde(deserialize_with = "text::lenient_opt", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Free-text market segment (searchable; GPU segment fallback)
    #[serde(deserialize_with = "text::lenient_opt", skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    /// Era label; present only on separators
    #[serde(deserialize_with = "text::lenient_opt", skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    /// CPU product lines
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skus: Vec<Sku>,
    /// GPU family data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_specs: Option<GpuSpecs>,
    /// Announced but not shipped
    #[serde(deserialize_with = "text::lenient_bool")]
    pub unreleased: bool,
    /// Links shown until the user saves their own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_links: Option<Vec<LinkRecord>>,
}

impl Entry {
    /// Create a CPU generation entry
    #[must_use]
    pub fn generation(id: impl Into<EntryId>, arch: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arch: arch.into(),
            year: year.into(),
            ..Self::default()
        }
    }

    /// Create an era separator
    #[must_use]
    pub fn separator(era: impl Into<String>) -> Self {
        Self {
            era: Some(era.into()),
            ..Self::default()
        }
    }

    /// Builder: append a SKU
    #[must_use]
    pub fn with_sku(mut self, sku: Sku) -> Self {
        self.skus.push(sku);
        self
    }

    /// Builder: set subtitle
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Builder: set GPU specs
    #[must_use]
    pub fn with_gpu_specs(mut self, specs: GpuSpecs) -> Self {
        self.gpu_specs = Some(specs);
        self
    }

    /// Builder: set default links
    #[must_use]
    pub fn with_default_links(mut self, links: Vec<LinkRecord>) -> Self {
        self.default_links = Some(links);
        self
    }

    /// True if this entry marks an era boundary
    #[inline]
    #[must_use]
    pub fn is_separator(&self) -> bool {
        self.era.is_some()
    }

    /// Distinct segment tags across all SKUs, in first-seen order
    #[must_use]
    pub fn segment_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for tag in self.skus.iter().flat_map(|sku| sku.tags.iter()) {
            if !tags.contains(&tag.as_str()) {
                tags.push(tag);
            }
        }
        tags
    }

    /// Distinct brands across all SKUs, in first-seen order
    #[must_use]
    pub fn brand_tags(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = Vec::new();
        for brand in self.skus.iter().filter_map(|sku| sku.brand.as_deref()) {
            if !brands.contains(&brand) {
                brands.push(brand);
            }
        }
        brands
    }

    /// Client/server badge derived from SKU tags
    #[must_use]
    pub fn segment_badge(&self) -> SegmentBadge {
        let has_server = self.skus.iter().any(Sku::is_server);
        let has_client = self.skus.iter().any(|sku| !sku.is_server());
        match (has_client, has_server) {
            (false, true) => SegmentBadge::Server,
            (true, false) => SegmentBadge::Client,
            _ => SegmentBadge::ClientAndServer,
        }
    }

    /// Effective GPU segment: entry segment, then specs segment, then datacenter
    #[must_use]
    pub fn gpu_segment(&self) -> GpuSegment {
        let parse = |s: &str| s.parse::<GpuSegment>().ok();
        self.segment
            .as_deref()
            .and_then(parse)
            .or_else(|| {
                self.gpu_specs
                    .as_ref()
                    .and_then(|specs| specs.segment.as_deref())
                    .and_then(parse)
            })
            .unwrap_or_default()
    }

    /// Distinct model form factors, as written in the dataset
    #[must_use]
    pub fn form_factors(&self) -> Vec<&str> {
        let mut forms: Vec<&str> = Vec::new();
        let models = self.gpu_specs.iter().flat_map(|specs| specs.models.iter());
        for form in models.filter_map(|model| model.form.as_deref()) {
            if !forms.contains(&form) {
                forms.push(form);
            }
        }
        forms
    }

    /// True if any GPU model ships in the given form factor
    #[must_use]
    pub fn has_form_factor(&self, factor: FormFactor) -> bool {
        self.form_factors().iter().any(|form| factor.matches(form))
    }
}

/// A product line inside a CPU generation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sku {
    /// Product line name; also the key into the spec table
    #[serde(deserialize_with = "text::lenient")]
    pub name: String,
    /// Short description
    #[serde(deserialize_with = "text::lenient")]
    pub desc: String,
    /// Segment facets (desktop, server, ...)
    pub tags: Vec<String>,
    /// Brand facet
    #[serde(deserialize_with = "text::lenient_opt", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl Sku {
    /// Create a SKU with name and description
    #[must_use]
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            ..Self::default()
        }
    }

    /// Builder: add a segment tag
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builder: set brand
    #[must_use]
    pub fn branded(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// True if tagged `server`
    #[inline]
    #[must_use]
    pub fn is_server(&self) -> bool {
        self.tags.iter().any(|t| t == "server")
    }
}

/// Client/server badge shown on CPU entry headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentBadge {
    /// Only client SKUs
    Client,
    /// Only server SKUs
    Server,
    /// Both (or no SKUs at all)
    ClientAndServer,
}

/// GPU family data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuSpecs {
    /// Family name
    #[serde(deserialize_with = "text::lenient")]
    pub family: String,
    /// Family description
    #[serde(deserialize_with = "text::lenient")]
    pub desc: String,
    /// Market segment, kept as written
    #[serde(deserialize_with = "text::lenient_opt", skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
    /// Consumer column layout
    #[serde(deserialize_with = "text::lenient_bool")]
    pub consumer: bool,
    /// Workstation column layout
    #[serde(deserialize_with = "text::lenient_bool")]
    pub workstation: bool,
    /// Models in this family
    pub models: Vec<GpuModel>,
}

impl GpuSpecs {
    /// Column layout of the model table
    #[inline]
    #[must_use]
    pub fn layout(&self) -> GpuTableLayout {
        if self.consumer {
            GpuTableLayout::Consumer
        } else if self.workstation {
            GpuTableLayout::Workstation
        } else {
            GpuTableLayout::Datacenter
        }
    }
}

/// Which columns a GPU model table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuTableLayout {
    /// Boost / game clock / VRAM / TBP
    Consumer,
    /// Boost / VRAM / FP64 / TBP
    Workstation,
    /// Architecture / process / matrix throughput / form factor
    Datacenter,
}

impl GpuTableLayout {
    /// Model fields included in the search text for this layout
    #[must_use]
    pub fn search_fields(&self) -> &'static [&'static str] {
        match self {
            GpuTableLayout::Consumer | GpuTableLayout::Workstation => {
                &["cu", "mem", "memType", "fp32", "boost"]
            }
            GpuTableLayout::Datacenter => &["arch", "process", "mem", "memType"],
        }
    }
}

/// One GPU model with free-form spec fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GpuModel {
    /// Model name
    #[serde(default, deserialize_with = "text::lenient")]
    pub name: String,
    /// Form factor (PCIe, OAM, ...)
    #[serde(default, deserialize_with = "text::lenient_opt", skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    /// Remaining spec columns
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl GpuModel {
    /// Create a model with a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: set form factor
    #[must_use]
    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    /// Builder: set a spec field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Display text of a spec field; empty if absent
    #[must_use]
    pub fn field(&self, key: &str) -> String {
        self.fields.get(key).map(text::value_to_text).unwrap_or_default()
    }
}

/// GPU market segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuSegment {
    /// Instinct accelerators
    #[default]
    Datacenter,
    /// Radeon PRO / FirePro
    Workstation,
    /// Radeon
    Consumer,
}

impl GpuSegment {
    /// All segments, in button order
    pub const ALL: [GpuSegment; 3] = [
        GpuSegment::Datacenter,
        GpuSegment::Workstation,
        GpuSegment::Consumer,
    ];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GpuSegment::Datacenter => "datacenter",
            GpuSegment::Workstation => "workstation",
            GpuSegment::Consumer => "consumer",
        }
    }

    /// Capitalized label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            GpuSegment::Datacenter => "Datacenter",
            GpuSegment::Workstation => "Workstation",
            GpuSegment::Consumer => "Consumer",
        }
    }
}

impl Display for GpuSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GpuSegment {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "datacenter" => Ok(GpuSegment::Datacenter),
            "workstation" => Ok(GpuSegment::Workstation),
            "consumer" => Ok(GpuSegment::Consumer),
            other => Err(ModelError::UnknownGpuSegment(other.to_string())),
        }
    }
}

/// GPU board form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    /// Add-in card
    Pcie,
    /// OCP accelerator module
    Oam,
}

impl FormFactor {
    /// All form factors, in button order
    pub const ALL: [FormFactor; 2] = [FormFactor::Pcie, FormFactor::Oam];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FormFactor::Pcie => "pcie",
            FormFactor::Oam => "oam",
        }
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            FormFactor::Pcie => "PCIe",
            FormFactor::Oam => "OAM",
        }
    }

    /// True if a dataset form string (e.g. `"PCIe / OAM"`) includes this factor
    #[must_use]
    pub fn matches(&self, form: &str) -> bool {
        form.to_lowercase().contains(self.as_str())
    }
}

impl Display for FormFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormFactor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pcie" => Ok(FormFactor::Pcie),
            "oam" => Ok(FormFactor::Oam),
            other => Err(ModelError::UnknownFormFactor(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_default() {
        let entry: Entry = serde_json::from_str(r#"{"id": "zen5"}"#).unwrap();
        assert_eq!(entry.id.as_str(), "zen5");
        assert!(entry.skus.is_empty());
        assert!(entry.subtitle.is_none());
        assert!(!entry.unreleased);
        assert!(!entry.is_separator());
    }

    #[test]
    fn separator_has_no_id() {
        let entry: Entry = serde_json::from_str(r#"{"era": "Core era"}"#).unwrap();
        assert!(entry.is_separator());
        assert!(entry.id.is_empty());
    }

    #[test]
    fn camel_case_fields_deserialize() {
        let json = r#"{
            "id": "cdna3", "arch": "CDNA 3", "year": "2023",
            "defaultLinks": [{"label": "AMD", "url": "https://amd.com"}],
            "gpuSpecs": {"family": "Instinct MI300", "desc": "APU + GPU",
                         "models": [{"name": "MI300X", "form": "OAM", "cu": 304}]}
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        let specs = entry.gpu_specs.as_ref().unwrap();
        assert_eq!(specs.models[0].field("cu"), "304");
        assert_eq!(specs.models[0].field("missing"), "");
        assert_eq!(entry.default_links.as_ref().unwrap().len(), 1);
        assert!(entry.has_form_factor(FormFactor::Oam));
        assert!(!entry.has_form_factor(FormFactor::Pcie));
    }

    #[test]
    fn tags_are_deduplicated_in_order() {
        let entry = Entry::generation("zen4", "Zen 4", "2022")
            .with_sku(Sku::new("Ryzen 7000", "").tagged("desktop").branded("Ryzen"))
            .with_sku(Sku::new("Ryzen 7040", "").tagged("laptop").tagged("desktop").branded("Ryzen"))
            .with_sku(Sku::new("Epyc 9004", "").tagged("server").branded("Epyc"));

        assert_eq!(entry.segment_tags(), vec!["desktop", "laptop", "server"]);
        assert_eq!(entry.brand_tags(), vec!["Ryzen", "Epyc"]);
        assert_eq!(entry.segment_badge(), SegmentBadge::ClientAndServer);
    }

    #[test]
    fn segment_badge_variants() {
        let server = Entry::generation("a", "A", "1").with_sku(Sku::new("x", "").tagged("server"));
        let client = Entry::generation("b", "B", "1").with_sku(Sku::new("y", "").tagged("desktop"));
        assert_eq!(server.segment_badge(), SegmentBadge::Server);
        assert_eq!(client.segment_badge(), SegmentBadge::Client);
    }

    #[test]
    fn gpu_segment_prefers_entry_segment() {
        let mut entry = Entry::generation("rdna3", "RDNA 3", "2022");
        assert_eq!(entry.gpu_segment(), GpuSegment::Datacenter);

        entry.gpu_specs = Some(GpuSpecs {
            segment: Some("consumer".to_string()),
            ..GpuSpecs::default()
        });
        assert_eq!(entry.gpu_segment(), GpuSegment::Consumer);

        entry.segment = Some("workstation".to_string());
        entry.gpu_specs = Some(GpuSpecs {
            segment: Some("datacenter".to_string()),
            ..GpuSpecs::default()
        });
        assert_eq!(entry.gpu_segment(), GpuSegment::Workstation);

        entry.segment = Some("accelerator".to_string());
        assert_eq!(entry.gpu_segment(), GpuSegment::Datacenter);
    }

    #[test]
    fn gpu_layout_from_flags() {
        let mut specs = GpuSpecs::default();
        assert_eq!(specs.layout(), GpuTableLayout::Datacenter);
        specs.workstation = true;
        assert_eq!(specs.layout(), GpuTableLayout::Workstation);
        specs.consumer = true;
        assert_eq!(specs.layout(), GpuTableLayout::Consumer);
    }

    #[test]
    fn numeric_flags_decode() {
        let json = r#"{
            "id": "rdna4", "unreleased": 1,
            "gpuSpecs": {"family": "Radeon RX 9000", "consumer": 1, "workstation": 0}
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(entry.unreleased);
        let specs = entry.gpu_specs.as_ref().unwrap();
        assert!(specs.consumer);
        assert!(!specs.workstation);
        assert_eq!(specs.layout(), GpuTableLayout::Consumer);

        let entry: Entry = serde_json::from_str(r#"{"id": "zen6", "unreleased": ""}"#).unwrap();
        assert!(!entry.unreleased);
    }

    #[test]
    fn form_factor_matches_compound_strings() {
        assert!(FormFactor::Pcie.matches("PCIe 5.0 x16"));
        assert!(FormFactor::Oam.matches("PCIe / OAM"));
        assert!(!FormFactor::Oam.matches("PCIe"));
    }
}
