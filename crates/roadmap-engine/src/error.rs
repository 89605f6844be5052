//! Error types for the roadmap engine

use roadmap_model::{EntryId, LinkInputError};
use roadmap_store::StoreError;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors loading viewer configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading config {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`crate::ViewerConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors from controller operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Id is not in the active dataset
    #[error("unknown entry: '{0}'")]
    UnknownEntry(EntryId),

    /// SKU name is not part of the entry
    #[error("unknown sku '{sku}' in entry '{entry}'")]
    UnknownSku {
        /// Entry searched
        entry: EntryId,
        /// Missing SKU name
        sku: String,
    },

    /// Link form input was rejected
    #[error(transparent)]
    LinkInput(#[from] LinkInputError),

    /// The primary dataset could not be loaded at startup
    #[error("initial data load failed: {0}")]
    StartupLoad(#[source] Arc<StoreError>),

    /// Configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Create unknown-sku error
    pub fn unknown_sku(entry: &EntryId, sku: impl Into<String>) -> Self {
        Self::UnknownSku {
            entry: entry.clone(),
            sku: sku.into(),
        }
    }
}
