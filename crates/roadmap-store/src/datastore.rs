//! Session-cached dataset loading
//!
//! Datasets are immutable once loaded and shared by `Arc`. Concurrent loads
//! of the same key share one pending fetch through moka's `try_get_with`;
//! failed loads are not cached, so the next call retries.

use crate::error::StoreError;
use crate::fetch::{Fetcher, FsFetcher, HttpFetcher};
use moka::future::Cache;
use roadmap_model::{Entry, SpecTable, Vendor};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Default number of cached datasets
pub const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Identifies one dataset file of a vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    /// Primary CPU roadmap, `{vendor}-data.json`
    Roadmap(Vendor),
    /// GPU roadmap, `{vendor}-gpu-data.json`
    Gpu(Vendor),
    /// Detailed CPU spec tables, `{vendor}-cpu-specs.json`
    CpuSpecs(Vendor),
}

impl DatasetKey {
    /// Vendor the dataset belongs to
    #[inline]
    #[must_use]
    pub fn vendor(&self) -> Vendor {
        match self {
            Self::Roadmap(v) | Self::Gpu(v) | Self::CpuSpecs(v) => *v,
        }
    }

    /// Path relative to the data root
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Roadmap(v) => format!("{v}-data.json"),
            Self::Gpu(v) => format!("{v}-gpu-data.json"),
            Self::CpuSpecs(v) => format!("{v}-cpu-specs.json"),
        }
    }
}

impl Display for DatasetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decoded dataset as held in the cache
#[derive(Debug, Clone)]
enum Dataset {
    Entries(Arc<Vec<Entry>>),
    Specs(Arc<SpecTable>),
}

/// Cached, de-duplicating dataset loader
///
/// Cheap to clone; clones share the cache and the loading counter.
#[derive(Debug, Clone)]
pub struct DataStore {
    fetcher: Arc<dyn Fetcher>,
    cache: Cache<DatasetKey, Dataset>,
    in_flight: Arc<watch::Sender<usize>>,
}

impl DataStore {
    /// Create store with default capacity
    #[must_use]
    pub fn new(fetcher: impl Fetcher + 'static) -> Self {
        Self::with_capacity(fetcher, DEFAULT_CACHE_CAPACITY)
    }

    /// Create store with a max number of cached datasets
    #[must_use]
    pub fn with_capacity(fetcher: impl Fetcher + 'static, max_capacity: u64) -> Self {
        Self::from_shared(Arc::new(fetcher), max_capacity)
    }

    /// Create store around an already shared fetcher
    #[must_use]
    pub fn from_shared(fetcher: Arc<dyn Fetcher>, max_capacity: u64) -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            fetcher,
            cache: Cache::new(max_capacity),
            in_flight: Arc::new(in_flight),
        }
    }

    /// Store reading from a local data directory
    #[must_use]
    pub fn fs(root: impl Into<std::path::PathBuf>) -> Self {
        Self::new(FsFetcher::new(root))
    }

    /// Store fetching from a base URL
    #[must_use]
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(HttpFetcher::new(base_url))
    }

    /// Load an entry dataset, resolving to empty on failure
    ///
    /// Failures are logged and not cached.
    pub async fn load(&self, key: DatasetKey) -> Arc<Vec<Entry>> {
        match self.try_load(key).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%key, error = %e, "dataset load failed, using empty dataset");
                Arc::default()
            }
        }
    }

    /// Load an entry dataset, reporting failure
    ///
    /// # Errors
    /// The fetch or decode error, shared with every caller of the same
    /// in-flight load. `CpuSpecs` keys are rejected with
    /// [`StoreError::KindMismatch`].
    pub async fn try_load(&self, key: DatasetKey) -> Result<Arc<Vec<Entry>>, Arc<StoreError>> {
        match self.get_or_fetch(key).await? {
            Dataset::Entries(entries) => Ok(entries),
            Dataset::Specs(_) => Err(Arc::new(StoreError::KindMismatch {
                key: key.to_string(),
                expected: "an entry list",
            })),
        }
    }

    /// Load a vendor's CPU spec tables, resolving to empty on failure
    pub async fn load_specs(&self, vendor: Vendor) -> Arc<SpecTable> {
        match self.try_load_specs(vendor).await {
            Ok(specs) => specs,
            Err(e) => {
                warn!(%vendor, error = %e, "cpu spec load failed, details unavailable");
                Arc::default()
            }
        }
    }

    /// Load a vendor's CPU spec tables, reporting failure
    ///
    /// # Errors
    /// The fetch or decode error
    pub async fn try_load_specs(&self, vendor: Vendor) -> Result<Arc<SpecTable>, Arc<StoreError>> {
        let key = DatasetKey::CpuSpecs(vendor);
        match self.get_or_fetch(key).await? {
            Dataset::Specs(specs) => Ok(specs),
            Dataset::Entries(_) => Err(Arc::new(StoreError::KindMismatch {
                key: key.to_string(),
                expected: "spec tables",
            })),
        }
    }

    async fn get_or_fetch(&self, key: DatasetKey) -> Result<Dataset, Arc<StoreError>> {
        if let Some(hit) = self.cache.get(&key).await {
            debug!(%key, "dataset cache hit");
            return Ok(hit);
        }

        let fetcher = Arc::clone(&self.fetcher);
        let in_flight = Arc::clone(&self.in_flight);
        self.cache
            .try_get_with(key, async move {
                let _guard = LoadingGuard::enter(&in_flight);
                fetch_dataset(fetcher.as_ref(), key).await
            })
            .await
    }

    /// Receiver for the number of loads in flight
    #[must_use]
    pub fn loading(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }

    /// True while any load is in flight
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.in_flight.borrow() > 0
    }

    /// Check if a dataset is cached
    #[inline]
    #[must_use]
    pub fn contains(&self, key: DatasetKey) -> bool {
        self.cache.contains_key(&key)
    }

    /// Approximate number of cached datasets
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Drop every cached dataset
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

async fn fetch_dataset(fetcher: &dyn Fetcher, key: DatasetKey) -> Result<Dataset, StoreError> {
    let path = key.path();
    let bytes = fetcher.fetch(&path).await?;
    let dataset = match key {
        DatasetKey::Roadmap(_) | DatasetKey::Gpu(_) => {
            let entries: Vec<Entry> =
                serde_json::from_slice(&bytes).map_err(|e| StoreError::decode(&path, e))?;
            debug!(%key, entries = entries.len(), "dataset loaded");
            Dataset::Entries(Arc::new(entries))
        }
        DatasetKey::CpuSpecs(_) => {
            let specs: SpecTable =
                serde_json::from_slice(&bytes).map_err(|e| StoreError::decode(&path, e))?;
            debug!(%key, skus = specs.len(), "spec tables loaded");
            Dataset::Specs(Arc::new(specs))
        }
    };
    Ok(dataset)
}

/// Counts a load as in flight until dropped
struct LoadingGuard<'a> {
    counter: &'a watch::Sender<usize>,
}

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a watch::Sender<usize>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self { counter }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.counter.send_modify(|n| *n = n.saturating_sub(1));
    }
}
