//! Error types for the roadmap model

/// Errors when parsing model identifiers from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Vendor name not recognised
    #[error("unknown vendor: '{0}'")]
    UnknownVendor(String),

    /// Tech tab name not recognised
    #[error("unknown tech tab: '{0}'")]
    UnknownTech(String),

    /// GPU segment name not recognised
    #[error("unknown gpu segment: '{0}'")]
    UnknownGpuSegment(String),

    /// Form factor name not recognised
    #[error("unknown form factor: '{0}'")]
    UnknownFormFactor(String),
}

/// Rejected link input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkInputError {
    /// URL was empty after trimming
    #[error("link url is empty")]
    EmptyUrl,
}
