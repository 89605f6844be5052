//! Testing utilities for the roadmap viewer workspace
//!
//! Shared fixtures, scripted fetchers, a recording presenter and failing
//! storage.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roadmap_engine::{
    DetailView, FacetPanel, Frame, Presenter, RenderController, ViewerConfig, Visibility,
};
use roadmap_model::{EntryId, Vendor};
use roadmap_store::{
    DataStore, DatasetKey, FetchError, Fetcher, KeyValueStore, PersistenceLayer, StorageError,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// ----------------------------------------------------------------------
// Datasets
// ----------------------------------------------------------------------

pub const AMD_ROADMAP: &str = r##"[
    {"era": "Zen 4 / Zen 5 era"},
    {"id": "zen4", "arch": "Zen 4", "year": 2022, "color": "#f97316", "subtitle": "Raphael · Genoa",
     "skus": [
        {"name": "Ryzen 7000", "desc": "Ryzen 9 7950X, Ryzen 5 7600", "tags": ["desktop"], "brand": "Ryzen"},
        {"name": "Ryzen 7040", "desc": "Phoenix", "tags": ["laptop"], "brand": "Ryzen"},
        {"name": "Epyc 9004", "desc": "Genoa", "tags": ["server"], "brand": "Epyc"}
     ]},
    {"era": "Zen / Zen 2 era"},
    {"id": "zen2", "arch": "Zen 2", "year": 2019, "color": "#14b8a6",
     "skus": [
        {"name": "Ryzen 3000", "desc": "Matisse", "tags": ["desktop"], "brand": "Ryzen"},
        {"name": "Threadripper 3000", "desc": "Castle Peak", "tags": ["desktop"], "brand": "Threadripper"}
     ]},
    {"id": "zen1", "arch": "Zen", "year": 2017, "color": "#c084fc", "subtitle": "Summit Ridge · Naples",
     "defaultLinks": [{"label": "WikiChip", "url": "https://en.wikichip.org/wiki/amd/microarchitectures/zen"}],
     "skus": [
        {"name": "Ryzen 1000", "desc": "Ryzen 7 1700, Ryzen 5 1600", "tags": ["desktop"], "brand": "Ryzen"},
        {"name": "Epyc 7001", "desc": "Naples", "tags": ["server"], "brand": "Epyc"}
     ]}
]"##;

pub const AMD_GPU: &str = r##"[
    {"era": "CDNA / RDNA"},
    {"id": "cdna3", "arch": "CDNA 3", "year": 2023, "color": "#ef4444",
     "gpuSpecs": {"family": "Instinct MI300", "desc": "Chiplet accelerator", "segment": "datacenter",
        "models": [
            {"name": "MI300X", "form": "OAM", "arch": "CDNA 3", "process": "5 nm", "mem": "192 GB", "memType": "HBM3"},
            {"name": "MI300A", "form": "APU / OAM", "mem": "128 GB"}
        ]}},
    {"id": "rdna3", "arch": "RDNA 3", "year": 2022, "color": "#10b981",
     "gpuSpecs": {"family": "Radeon RX 7000", "segment": "consumer", "consumer": true,
        "models": [{"name": "RX 7900 XTX", "form": "PCIe", "cu": 96, "mem": "24 GB", "boost": "2.5 GHz"}]}},
    {"id": "w7000", "arch": "RDNA 3 PRO", "year": 2023, "segment": "workstation",
     "gpuSpecs": {"family": "Radeon PRO W7000", "workstation": true,
        "models": [{"name": "W7900", "form": "PCIe", "cu": 96, "mem": "48 GB"}]}}
]"##;

pub const AMD_CPU_SPECS: &str = r#"{
    "Ryzen 1000": [
        {"n": "Ryzen 7 1700", "c": 8, "t": 16, "bst": "3.7 GHz", "bas": "3.0 GHz", "l3": "16 MB", "tdp": "65 W", "sk": "AM4", "tr": "YD1700BBM88AE"},
        {"n": "Ryzen 7 1700X", "c": 8, "t": 16, "bst": "3.8 GHz", "bas": "3.4 GHz", "l3": "16 MB", "tdp": "95 W", "sk": "AM4"}
    ],
    "Epyc 7001": [
        {"n": "EPYC 7601", "c": 32, "t": 64, "tdp": "180 W", "sk": "SP3", "_srv": true, "skc": "1P/2P", "pcie": "128x Gen3", "mem": "DDR4-2666"}
    ],
    "Ryzen 7000": [
        {"n": "Ryzen 9 7950X", "c": 16, "t": 32, "sk": "AM5", "gm": "Radeon Graphics", "gc": 2, "gf": "2.2 GHz"}
    ]
}"#;

pub const INTEL_ROADMAP: &str = r##"[
    {"era": "Core Ultra"},
    {"id": "lunar-lake", "arch": "Lunar Lake", "year": 2024, "color": "#38bdf8",
     "skus": [{"name": "Core Ultra 200V", "desc": "Core Ultra 7 258V", "tags": ["mobile"], "brand": "Core Ultra"}]},
    {"id": "granite-rapids", "arch": "Granite Rapids", "year": 2024, "color": "#ef4444",
     "skus": [{"name": "Xeon 6900P", "desc": "Xeon 6980P", "tags": ["server"], "brand": "Xeon 6 P"}]}
]"##;

pub const INTEL_CPU_SPECS: &str = r#"{
    "Core Ultra 200V": [{"n": "Core Ultra 7 258V", "c": 8, "t": 8, "gm": "Arc 140V", "gc": 8}]
}"#;

// ----------------------------------------------------------------------
// Fetchers
// ----------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
}

/// Serves canned files by path and counts fetches
///
/// Unknown paths answer 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    files: HashMap<String, Reply>,
    delay: Duration,
    calls: Mutex<HashMap<String, usize>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every AMD and Intel fixture file
    pub fn with_fixtures() -> Self {
        Self::new()
            .with_dataset(DatasetKey::Roadmap(Vendor::Amd), AMD_ROADMAP)
            .with_dataset(DatasetKey::Gpu(Vendor::Amd), AMD_GPU)
            .with_dataset(DatasetKey::CpuSpecs(Vendor::Amd), AMD_CPU_SPECS)
            .with_dataset(DatasetKey::Roadmap(Vendor::Intel), INTEL_ROADMAP)
            .with_dataset(DatasetKey::CpuSpecs(Vendor::Intel), INTEL_CPU_SPECS)
    }

    pub fn with_file(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn with_dataset(self, key: DatasetKey, body: &str) -> Self {
        self.with_file(&key.path(), body)
    }

    pub fn failing(mut self, key: DatasetKey, status: u16) -> Self {
        self.files.insert(key.path(), Reply::Status(status));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self, key: DatasetKey) -> usize {
        self.calls.lock().get(&key.path()).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        *self.calls.lock().entry(path.to_string()).or_insert(0) += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.files.get(path) {
            Some(Reply::Body(body)) => Ok(body.as_bytes().to_vec()),
            Some(Reply::Status(status)) => Err(FetchError::status(path, *status)),
            None => Err(FetchError::status(path, 404)),
        }
    }
}

// ----------------------------------------------------------------------
// Storage
// ----------------------------------------------------------------------

/// Storage that rejects every operation
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded { limit: 0 })
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}

// ----------------------------------------------------------------------
// Presenter
// ----------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    Loading,
    LoadFailure(String),
    Render {
        frame: Box<Frame>,
        visibility: Visibility,
        details: DetailView,
    },
    Visibility {
        visibility: Visibility,
        details: DetailView,
    },
    Facets(FacetPanel),
    Expanded(EntryId, bool),
    Details(DetailView),
    LinkForm(EntryId, bool),
    Scroll(EntryId),
}

impl PresenterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PresenterEvent::Loading => "loading",
            PresenterEvent::LoadFailure(_) => "load_failure",
            PresenterEvent::Render { .. } => "render",
            PresenterEvent::Visibility { .. } => "visibility",
            PresenterEvent::Facets(_) => "facets",
            PresenterEvent::Expanded(..) => "expanded",
            PresenterEvent::Details(_) => "details",
            PresenterEvent::LinkForm(..) => "link_form",
            PresenterEvent::Scroll(_) => "scroll",
        }
    }
}

/// Records every presenter call in order
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(PresenterEvent::name).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn render_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PresenterEvent::Render { .. }))
            .count()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::Render { frame, .. } => Some(frame.as_ref()),
            _ => None,
        })
    }

    /// Visibility from the latest full render or incremental update
    pub fn last_visibility(&self) -> Option<&Visibility> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::Render { visibility, .. } | PresenterEvent::Visibility { visibility, .. } => {
                Some(visibility)
            }
            _ => None,
        })
    }

    /// Detail state from the latest event carrying one
    pub fn last_details(&self) -> Option<&DetailView> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::Render { details, .. }
            | PresenterEvent::Visibility { details, .. }
            | PresenterEvent::Details(details) => Some(details),
            _ => None,
        })
    }

    pub fn last_facets(&self) -> Option<&FacetPanel> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::Facets(facets) => Some(facets),
            PresenterEvent::Render { frame, .. } => Some(&frame.facets),
            _ => None,
        })
    }
}

impl Presenter for RecordingPresenter {
    fn show_loading(&mut self) {
        self.events.push(PresenterEvent::Loading);
    }

    fn show_load_failure(&mut self, message: &str) {
        self.events.push(PresenterEvent::LoadFailure(message.to_string()));
    }

    fn render(&mut self, frame: &Frame, visibility: &Visibility, details: &DetailView) {
        self.events.push(PresenterEvent::Render {
            frame: Box::new(frame.clone()),
            visibility: visibility.clone(),
            details: details.clone(),
        });
    }

    fn update_visibility(&mut self, visibility: &Visibility, details: &DetailView) {
        self.events.push(PresenterEvent::Visibility {
            visibility: visibility.clone(),
            details: details.clone(),
        });
    }

    fn update_facets(&mut self, facets: &FacetPanel) {
        self.events.push(PresenterEvent::Facets(facets.clone()));
    }

    fn set_expanded(&mut self, id: &EntryId, expanded: bool) {
        self.events.push(PresenterEvent::Expanded(id.clone(), expanded));
    }

    fn update_details(&mut self, details: &DetailView) {
        self.events.push(PresenterEvent::Details(details.clone()));
    }

    fn show_link_form(&mut self, id: &EntryId, open: bool) {
        self.events.push(PresenterEvent::LinkForm(id.clone(), open));
    }

    fn scroll_into_view(&mut self, id: &EntryId) {
        self.events.push(PresenterEvent::Scroll(id.clone()));
    }
}

// ----------------------------------------------------------------------
// Controllers
// ----------------------------------------------------------------------

pub type TestController = RenderController<RecordingPresenter>;

/// Controller over a fetcher with in-memory persistence
pub fn controller_with(fetcher: Arc<StaticFetcher>, config: ViewerConfig) -> TestController {
    let store = DataStore::new(fetcher);
    RenderController::new(config, store, PersistenceLayer::default(), RecordingPresenter::new())
}

/// Started AMD controller over the fixture files
pub async fn started_amd() -> (TestController, Arc<StaticFetcher>) {
    let fetcher = Arc::new(StaticFetcher::with_fixtures());
    let mut controller = controller_with(Arc::clone(&fetcher), ViewerConfig::default());
    controller.start().await.unwrap();
    controller.presenter_mut().clear();
    (controller, fetcher)
}
