//! User actions routed through [`RenderController::dispatch`]
//!
//! [`RenderController::dispatch`]: crate::RenderController::dispatch

use crate::detail::RowKey;
use crate::filter::LegendFacet;
use roadmap_model::{EntryId, FormFactor, GpuSegment, TechTab, Vendor};

/// Everything a user can do on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Vendor switcher
    SwitchVendor(Vendor),
    /// CPU/GPU tab
    SwitchTech(TechTab),
    /// Entry header click
    ToggleExpand(EntryId),
    /// Expand every generation
    ExpandAll,
    /// Collapse every generation
    CollapseAll,
    /// Codename table row click
    JumpTo(EntryId),
    /// CPU segment button (`all` clears)
    SelectSegment(String),
    /// CPU legend item
    ToggleLegend(LegendFacet, String),
    /// GPU segment button; `None` is all
    SelectGpuSegment(Option<GpuSegment>),
    /// GPU form factor button
    ToggleGpuForm(FormFactor),
    /// Keystroke in the search box
    SearchInput(String),
    /// Search clear button
    ClearSearch,
    /// Apply a pending search term now
    FlushSearch,
    /// SKU row click
    ToggleSkuDetails {
        /// Owning entry
        entry: EntryId,
        /// SKU name
        sku: String,
    },
    /// Collapse button of an entry's spec panel
    CollapseDetails(EntryId),
    /// Spec table row click
    SelectRow {
        /// Row clicked
        key: RowKey,
        /// Modifier held
        additive: bool,
    },
    /// Clear row selections
    ClearSelections,
    /// Notes edited
    EditNotes {
        /// Entry annotated
        entry: EntryId,
        /// Full notes text
        text: String,
    },
    /// Open the add-link form
    ShowLinkForm(EntryId),
    /// Close the add-link form
    HideLinkForm(EntryId),
    /// Submit the add-link form
    AddLink {
        /// Entry annotated
        entry: EntryId,
        /// Label input, may be blank
        label: String,
        /// URL input
        url: String,
    },
    /// Delete a link
    RemoveLink {
        /// Entry annotated
        entry: EntryId,
        /// Link position
        index: usize,
    },
}
