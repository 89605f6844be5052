//! Raw dataset fetching
//!
//! A [`Fetcher`] turns a dataset path such as `amd-data.json` into bytes.
//! Paths are relative to the fetcher's root, which is a directory for
//! [`FsFetcher`] and a base URL for [`HttpFetcher`].

use crate::error::FetchError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Source of raw dataset bytes
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    /// Fetch the file at `path`, relative to this fetcher's root
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(path).await
    }
}

/// Reads datasets from a local directory
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Create fetcher rooted at a directory
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full = self.root.join(path);
        debug!(path = %full.display(), "reading dataset file");
        tokio::fs::read(&full)
            .await
            .map_err(|e| FetchError::io_error(full, e))
    }
}

/// Fetches datasets over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create fetcher for a base URL such as `https://host/js/data`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create fetcher sharing an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    /// Full URL for a dataset path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path);
        debug!(%url, "requesting dataset");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
