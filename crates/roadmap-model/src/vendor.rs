//! Built-in per-vendor presentation config

use crate::entry::{FormFactor, GpuSegment};
use crate::ids::Vendor;
use serde::Serialize;

/// A filterable tag with its legend color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagDef {
    /// Tag value as it appears in SKU data
    pub tag: &'static str,
    /// Legend color
    pub color: &'static str,
    /// Legend label
    pub label: &'static str,
}

impl TagDef {
    const fn new(tag: &'static str, color: &'static str, label: &'static str) -> Self {
        Self { tag, color, label }
    }

    /// Brand tags are labelled with the tag itself
    const fn brand(tag: &'static str, color: &'static str) -> Self {
        Self::new(tag, color, tag)
    }
}

/// One row of the codename quick reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodenameRow {
    /// Generation label
    pub generation: &'static str,
    /// Entry the row jumps to
    pub entry_id: &'static str,
    /// Process node
    pub process: &'static str,
    /// Accent color
    pub color: &'static str,
    /// Desktop codenames
    pub desktop: &'static str,
    /// HEDT codenames, empty if none
    pub hedt: &'static str,
    /// Laptop codenames
    pub laptop: &'static str,
    /// Handheld codenames, empty if none
    pub handheld: &'static str,
    /// Server codenames
    pub server: &'static str,
}

/// GPU tab presentation for vendors that ship a GPU dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GpuConfig {
    /// Header title on the GPU tab
    pub title: &'static str,
    /// Header subtitle on the GPU tab
    pub subtitle: &'static str,
}

/// Static per-vendor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorConfig {
    /// Vendor this config belongs to
    pub vendor: Vendor,
    /// Header title on the CPU tab
    pub title: &'static str,
    /// Header theming class
    pub header_class: &'static str,
    /// Header subtitle on the CPU tab
    pub subtitle: &'static str,
    /// Segment legend
    pub segment_tags: &'static [TagDef],
    /// Brand legend
    pub brand_tags: &'static [TagDef],
    /// Segment buttons, `all` first
    pub filter_buttons: &'static [&'static str],
    /// Codename quick reference, empty if the vendor has none
    pub codename_table: &'static [CodenameRow],
    /// GPU tab, if the vendor has a GPU dataset
    pub gpu: Option<GpuConfig>,
}

const CPU_SUBTITLE: &str = "Processor Architecture Generations";

const INTEL_SEGMENTS: &[TagDef] = &[
    TagDef::new("desktop", "#4ade80", "Desktop"),
    TagDef::new("mobile", "#f472b6", "Mobile"),
    TagDef::new("server", "#fbbf24", "Server"),
    TagDef::new("embedded", "#c084fc", "Embedded/IoT"),
];

const INTEL_BRANDS: &[TagDef] = &[
    TagDef::brand("Core Ultra", "#38bdf8"),
    TagDef::brand("Core", "#fb923c"),
    TagDef::brand("Xeon", "#a78bfa"),
    TagDef::brand("Xeon 6 P", "#ef4444"),
    TagDef::brand("Xeon 6 E", "#14b8a6"),
];

const AMD_SEGMENTS: &[TagDef] = &[
    TagDef::new("desktop", "#4ade80", "Desktop"),
    TagDef::new("laptop", "#f472b6", "Laptop"),
    TagDef::new("handheld", "#22d3ee", "Handheld"),
    TagDef::new("server", "#fbbf24", "Server"),
];

const AMD_BRANDS: &[TagDef] = &[
    TagDef::brand("Ryzen", "#f97316"),
    TagDef::brand("Ryzen AI", "#06b6d4"),
    TagDef::brand("Threadripper", "#f59e0b"),
    TagDef::brand("Epyc", "#10b981"),
    TagDef::brand("Athlon", "#8b5cf6"),
];

const AMD_CODENAMES: &[CodenameRow] = &[
    CodenameRow {
        generation: "Zen 5",
        entry_id: "zen5",
        process: "4/3 nm",
        color: "#ef4444",
        desktop: "Granite Ridge",
        hedt: "Shimada Peak",
        laptop: "Strix Point · Strix Halo · Gorgon Point · Fire Range",
        handheld: "Z2",
        server: "Turin / Turin Dense",
    },
    CodenameRow {
        generation: "Zen 4",
        entry_id: "zen4",
        process: "5 nm",
        color: "#f97316",
        desktop: "Raphael",
        hedt: "Storm Peak",
        laptop: "Dragon Range · Phoenix · Hawk Point · Hawk Point Refresh",
        handheld: "Z1",
        server: "Genoa · Genoa-X · Bergamo · Siena",
    },
    CodenameRow {
        generation: "Zen 3+",
        entry_id: "zen3plus",
        process: "6 nm",
        color: "#f59e0b",
        desktop: "—",
        hedt: "",
        laptop: "Rembrandt",
        handheld: "",
        server: "—",
    },
    CodenameRow {
        generation: "Zen 3",
        entry_id: "zen3",
        process: "7 nm",
        color: "#84cc16",
        desktop: "Vermeer · Cezanne",
        hedt: "Chagall",
        laptop: "Cezanne · Barceló",
        handheld: "",
        server: "Milan · Milan-X",
    },
    CodenameRow {
        generation: "Zen 2",
        entry_id: "zen2",
        process: "7 nm",
        color: "#14b8a6",
        desktop: "Matisse · Renoir",
        hedt: "Castle Peak",
        laptop: "Renoir · Lucienne · Mendocino",
        handheld: "",
        server: "Rome",
    },
    CodenameRow {
        generation: "Zen+",
        entry_id: "zenplus",
        process: "12 nm",
        color: "#818cf8",
        desktop: "Pinnacle Ridge",
        hedt: "Colfax",
        laptop: "Picasso",
        handheld: "",
        server: "—",
    },
    CodenameRow {
        generation: "Zen",
        entry_id: "zen1",
        process: "14 nm",
        color: "#c084fc",
        desktop: "Summit Ridge · Raven Ridge",
        hedt: "Whitehaven",
        laptop: "Raven Ridge · Dalí",
        handheld: "",
        server: "Naples",
    },
];

const GPU_SEGMENTS: &[TagDef] = &[
    TagDef::new("datacenter", "#ef4444", "Datacenter"),
    TagDef::new("workstation", "#818cf8", "Workstation"),
    TagDef::new("consumer", "#10b981", "Consumer"),
];

const GPU_FORMS: &[TagDef] = &[
    TagDef::new("pcie", "#60a5fa", "PCIe"),
    TagDef::new("oam", "#f59e0b", "OAM"),
];

impl VendorConfig {
    /// Built-in config for a vendor
    #[must_use]
    pub fn builtin(vendor: Vendor) -> Self {
        match vendor {
            Vendor::Intel => Self {
                vendor,
                title: "Intel Client + Server Roadmap",
                header_class: "header-intel",
                subtitle: CPU_SUBTITLE,
                segment_tags: INTEL_SEGMENTS,
                brand_tags: INTEL_BRANDS,
                filter_buttons: &["all", "desktop", "mobile", "server", "embedded"],
                codename_table: &[],
                gpu: None,
            },
            Vendor::Amd => Self {
                vendor,
                title: "AMD Zen Architecture Roadmap",
                header_class: "header-amd",
                subtitle: CPU_SUBTITLE,
                segment_tags: AMD_SEGMENTS,
                brand_tags: AMD_BRANDS,
                filter_buttons: &["all", "desktop", "laptop", "handheld", "server"],
                codename_table: AMD_CODENAMES,
                gpu: Some(GpuConfig {
                    title: "AMD GPU Roadmap",
                    subtitle: "Instinct · Radeon · Radeon PRO · FirePro",
                }),
            },
        }
    }

    /// True if the vendor ships a GPU dataset
    #[inline]
    #[must_use]
    pub fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }

    /// GPU segment legend, in [`GpuSegment::ALL`] order
    #[must_use]
    pub fn gpu_segment_tags() -> &'static [TagDef] {
        GPU_SEGMENTS
    }

    /// GPU form factor legend, in [`FormFactor::ALL`] order
    #[must_use]
    pub fn gpu_form_tags() -> &'static [TagDef] {
        GPU_FORMS
    }

    /// Legend definition for a GPU segment
    #[must_use]
    pub fn gpu_segment_tag(segment: GpuSegment) -> Option<&'static TagDef> {
        GPU_SEGMENTS.iter().find(|def| def.tag == segment.as_str())
    }

    /// Legend definition for a form factor
    #[must_use]
    pub fn gpu_form_tag(form: FormFactor) -> Option<&'static TagDef> {
        GPU_FORMS.iter().find(|def| def.tag == form.as_str())
    }

    /// Color of a segment tag, if defined
    #[must_use]
    pub fn segment_color(&self, tag: &str) -> Option<&'static str> {
        self.segment_tags
            .iter()
            .find(|def| def.tag == tag)
            .map(|def| def.color)
    }

    /// Color of a brand tag, if defined
    #[must_use]
    pub fn brand_color(&self, brand: &str) -> Option<&'static str> {
        self.brand_tags
            .iter()
            .find(|def| def.tag == brand)
            .map(|def| def.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_amd_has_gpu_and_codenames() {
        let intel = VendorConfig::builtin(Vendor::Intel);
        let amd = VendorConfig::builtin(Vendor::Amd);
        assert!(!intel.has_gpu());
        assert!(intel.codename_table.is_empty());
        assert!(amd.has_gpu());
        assert_eq!(amd.codename_table.len(), 7);
        assert_eq!(amd.codename_table.last().map(|r| r.entry_id), Some("zen1"));
    }

    #[test]
    fn filter_buttons_start_with_all_and_match_segments() {
        for vendor in Vendor::ALL {
            let cfg = VendorConfig::builtin(vendor);
            assert_eq!(cfg.filter_buttons[0], "all");
            for button in &cfg.filter_buttons[1..] {
                assert!(cfg.segment_color(button).is_some(), "{button}");
            }
        }
    }

    #[test]
    fn gpu_legends_cover_all_variants() {
        for segment in GpuSegment::ALL {
            let def = VendorConfig::gpu_segment_tag(segment).unwrap();
            assert_eq!(def.label, segment.label());
        }
        for form in FormFactor::ALL {
            let def = VendorConfig::gpu_form_tag(form).unwrap();
            assert_eq!(def.label, form.label());
        }
    }

    #[test]
    fn brand_colors_resolve() {
        let amd = VendorConfig::builtin(Vendor::Amd);
        assert_eq!(amd.brand_color("Epyc"), Some("#10b981"));
        assert_eq!(amd.segment_color("handheld"), Some("#22d3ee"));
        assert_eq!(amd.brand_color("Xeon"), None);
    }
}
