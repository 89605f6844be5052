//! Roadmap Engine
//!
//! View state, filtering and render control for the roadmap viewer.
//!
//! # Architecture
//!
//! ```text
//! Action ──> RenderController::dispatch
//!                  │
//!                  ├─ ViewState (vendor, tab, expanded)
//!                  │    ├─ FilterState ──> Visibility
//!                  │    └─ DetailState ──> DetailView
//!                  ├─ DataStore / PersistenceLayer
//!                  │
//!                  └─> Presenter (render | incremental updates)
//! ```
//!
//! Visibility is a pure function of the filter state and the dataset; the
//! controller never reads anything back from the presenter.
//!
//! # Example
//!
//! ```rust,no_run
//! use roadmap_engine::{Action, RenderController, ViewerConfig};
//! # use roadmap_engine::Presenter;
//! # async fn demo<P: Presenter>(presenter: P) -> Result<(), roadmap_engine::EngineError> {
//! let config = ViewerConfig::new().with_data_root("js/data");
//! let mut controller = RenderController::from_config(config, presenter);
//! controller.start().await?;
//! controller.dispatch(Action::SelectSegment("server".to_string())).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

mod action;
mod config;
mod controller;
mod debounce;
mod detail;
mod error;
mod facets;
mod filter;
mod frame;
mod presenter;
mod view;

pub use action::Action;
pub use config::ViewerConfig;
pub use controller::{RenderController, LOAD_FAILURE_MESSAGE};
pub use debounce::{SearchDebouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use detail::{DetailState, DetailView, RowKey};
pub use error::{ConfigError, EngineError};
pub use facets::{FacetButton, FacetKind, FacetPanel, LegendItem};
pub use filter::{EntryText, EntryVisibility, FilterState, LegendFacet, SearchIndex, Visibility};
pub use frame::{Badge, EntryView, Frame, FrameContext, GenerationView, GpuView, Header, SkuView};
pub use presenter::Presenter;
pub use view::ViewState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
