//! Viewer configuration

use crate::error::ConfigError;
use roadmap_model::Vendor;
use roadmap_store::{
    DataStore, FsFetcher, HttpFetcher, JsonFileStore, PersistenceLayer, DEFAULT_CACHE_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Viewer configuration
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```toml
/// data_root = "https://example.com/js/data"
/// search_debounce_ms = 200
/// storage_path = "annotations.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Dataset directory, or base URL when it starts with `http://`/`https://`
    pub data_root: String,
    /// Trailing-edge search debounce in milliseconds
    pub search_debounce_ms: u64,
    /// Max cached datasets
    pub cache_capacity: u64,
    /// Vendor shown on startup
    pub startup_vendor: Vendor,
    /// Annotation file; in-memory storage when unset
    pub storage_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_root: "js/data".to_string(),
            search_debounce_ms: 300,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            startup_vendor: Vendor::Amd,
            storage_path: None,
        }
    }
}

impl ViewerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With dataset root
    #[inline]
    #[must_use]
    pub fn with_data_root(mut self, root: impl Into<String>) -> Self {
        self.data_root = root.into();
        self
    }

    /// With search debounce
    #[inline]
    #[must_use]
    pub fn with_search_debounce_ms(mut self, ms: u64) -> Self {
        self.search_debounce_ms = ms;
        self
    }

    /// With dataset cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With startup vendor
    #[inline]
    #[must_use]
    pub fn with_startup_vendor(mut self, vendor: Vendor) -> Self {
        self.startup_vendor = vendor;
        self
    }

    /// With annotation file
    #[inline]
    #[must_use]
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Search debounce as a duration
    #[inline]
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` on invalid TOML or field types
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if unreadable, `ConfigError::Parse` if invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// True when datasets are fetched over HTTP
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.data_root.starts_with("http://") || self.data_root.starts_with("https://")
    }

    /// Dataset store for the configured root
    #[must_use]
    pub fn data_store(&self) -> DataStore {
        if self.is_remote() {
            DataStore::with_capacity(HttpFetcher::new(&self.data_root), self.cache_capacity)
        } else {
            DataStore::with_capacity(FsFetcher::new(&self.data_root), self.cache_capacity)
        }
    }

    /// Persistence over the configured annotation file
    ///
    /// Falls back to in-memory storage if the file cannot be opened.
    #[must_use]
    pub fn persistence(&self) -> PersistenceLayer {
        let Some(path) = &self.storage_path else {
            return PersistenceLayer::default();
        };
        match JsonFileStore::open(path) {
            Ok(store) => PersistenceLayer::new(store),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "annotation file unusable, notes will not persist");
                PersistenceLayer::default()
            }
        }
    }
}
