//! Roadmap Model
//!
//! Typed data model for the processor/GPU roadmap viewer.
//!
//! # Core Concepts
//!
//! - [`Entry`]: one architecture generation on the timeline, or an era separator
//! - [`Sku`]: a product line inside a CPU generation
//! - [`GpuSpecs`] / [`GpuModel`]: GPU family data with per-model spec fields
//! - [`CpuSpecRow`]: a row of a detailed CPU spec table, tagged server or client
//! - [`VendorConfig`]: static per-vendor facets, titles and codename table
//! - [`LinkRecord`]: a user-managed reference link
//!
//! # Example
//!
//! ```rust
//! use roadmap_model::{Entry, Vendor, VendorConfig};
//!
//! let json = r##"[
//!     {"era": "Zen era"},
//!     {"id": "zen1", "arch": "Zen", "year": 2017, "color": "#c084fc",
//!      "skus": [{"name": "Ryzen 1700", "desc": "8C/16T", "tags": ["desktop"], "brand": "Ryzen"}]}
//! ]"##;
//! let entries: Vec<Entry> = serde_json::from_str(json).unwrap();
//!
//! assert!(entries[0].is_separator());
//! assert_eq!(entries[1].id.as_str(), "zen1");
//! assert_eq!(entries[1].year, "2017");
//! assert!(VendorConfig::builtin(Vendor::Amd).has_gpu());
//! ```

#![warn(unreachable_pub)]

mod entry;
mod error;
mod ids;
mod link;
mod spec_row;
mod text;
mod vendor;

pub use entry::{Entry, FormFactor, GpuModel, GpuSegment, GpuSpecs, GpuTableLayout, SegmentBadge, Sku};
pub use error::{LinkInputError, ModelError};
pub use ids::{EntryId, TechTab, Vendor};
pub use link::LinkRecord;
pub use spec_row::{CpuSpecRow, CpuSpecVariant, SpecTable, SpecTableLayout};
pub use vendor::{CodenameRow, GpuConfig, TagDef, VendorConfig};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with roadmap data
    pub use crate::{
        CpuSpecRow, Entry, EntryId, FormFactor, GpuSegment, GpuSpecs, LinkRecord, Sku, SpecTable,
        TechTab, Vendor, VendorConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
