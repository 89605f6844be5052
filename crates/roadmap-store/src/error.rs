//! Error types for dataset loading and local storage

use std::path::PathBuf;

/// Errors fetching raw dataset bytes
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// IO error reading a local dataset file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Server answered with a non-success status
    #[error("request to {url} failed with status {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Connection or body transfer failed
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create status error for url
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }
}

/// Errors loading a dataset
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Raw bytes could not be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Bytes were not valid dataset JSON
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Dataset path
        path: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Key names a dataset of a different shape than requested
    #[error("dataset {key} does not hold {expected}")]
    KindMismatch {
        /// Requested dataset
        key: String,
        /// Shape the caller asked for
        expected: &'static str,
    },
}

impl StoreError {
    /// Create decode error for dataset path
    pub fn decode(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }
}

/// Errors from a key-value storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backing file could not be read or written
    #[error("storage io error at {path}: {source}")]
    Io {
        /// Backing file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored content is not valid JSON
    #[error("stored data at {location} is corrupt: {source}")]
    Corrupt {
        /// Key or file holding the bad data
        location: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Write would exceed the backend's size limit
    #[error("storage quota of {limit} bytes exceeded")]
    QuotaExceeded {
        /// Quota in bytes
        limit: usize,
    },

    /// Backend cannot be used at all
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create corrupt-data error
    pub fn corrupt(location: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            location: location.into(),
            source,
        }
    }
}
