//! Identifiers: vendors, tech tabs and entry ids

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Processor vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Intel client + server roadmap
    Intel,
    /// AMD Zen roadmap (plus GPU roadmap)
    Amd,
}

impl Vendor {
    /// All known vendors, in tab order
    pub const ALL: [Vendor; 2] = [Vendor::Intel, Vendor::Amd];

    /// Lowercase name used in dataset paths and storage keys
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Intel => "intel",
            Vendor::Amd => "amd",
        }
    }
}

impl Display for Vendor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intel" => Ok(Vendor::Intel),
            "amd" => Ok(Vendor::Amd),
            other => Err(ModelError::UnknownVendor(other.to_string())),
        }
    }
}

/// Which dataset of a vendor drives the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechTab {
    /// CPU generations with SKUs
    #[default]
    Cpu,
    /// GPU families with models
    Gpu,
}

impl TechTab {
    /// Lowercase tab name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TechTab::Cpu => "cpu",
            TechTab::Gpu => "gpu",
        }
    }
}

impl Display for TechTab {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechTab {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(TechTab::Cpu),
            "gpu" => Ok(TechTab::Gpu),
            other => Err(ModelError::UnknownTech(other.to_string())),
        }
    }
}

/// Stable entry identifier
///
/// Used as the persistence key and presentation anchor. Separator entries
/// usually carry an empty id.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Create id from any string
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty id carried by separators
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_roundtrips_through_str() {
        for vendor in Vendor::ALL {
            assert_eq!(vendor.as_str().parse::<Vendor>().unwrap(), vendor);
        }
        assert_eq!(" AMD ".parse::<Vendor>().unwrap(), Vendor::Amd);
        assert!(matches!(
            "nvidia".parse::<Vendor>(),
            Err(ModelError::UnknownVendor(v)) if v == "nvidia"
        ));
    }

    #[test]
    fn tech_tab_defaults_to_cpu() {
        assert_eq!(TechTab::default(), TechTab::Cpu);
        assert_eq!("gpu".parse::<TechTab>().unwrap(), TechTab::Gpu);
        assert!("npu".parse::<TechTab>().is_err());
    }

    #[test]
    fn entry_id_is_transparent_in_json() {
        let id: EntryId = serde_json::from_str("\"zen4\"").unwrap();
        assert_eq!(id, EntryId::from("zen4"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"zen4\"");
    }
}
