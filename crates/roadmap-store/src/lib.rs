//! Roadmap Store
//!
//! Data access for the roadmap viewer:
//!
//! - [`DataStore`]: loads vendor datasets through a [`Fetcher`], caches them
//!   for the session and coalesces concurrent loads of the same dataset
//! - [`PersistenceLayer`]: user notes and links over a [`KeyValueStore`],
//!   best-effort with an in-memory overlay
//!
//! # Example
//!
//! ```rust,no_run
//! use roadmap_model::Vendor;
//! use roadmap_store::{DataStore, DatasetKey, FsFetcher};
//!
//! # async fn demo() {
//! let store = DataStore::new(FsFetcher::new("js/data"));
//! let entries = store.load(DatasetKey::Roadmap(Vendor::Amd)).await;
//! let again = store.load(DatasetKey::Roadmap(Vendor::Amd)).await;
//! assert!(std::sync::Arc::ptr_eq(&entries, &again));
//! # }
//! ```

#![warn(unreachable_pub)]

mod datastore;
mod error;
mod fetch;
mod kv;
mod persistence;

pub use datastore::{DataStore, DatasetKey, DEFAULT_CACHE_CAPACITY};
pub use error::{FetchError, StorageError, StoreError};
pub use fetch::{Fetcher, FsFetcher, HttpFetcher};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use persistence::PersistenceLayer;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
