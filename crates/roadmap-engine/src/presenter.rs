//! Presentation contract

use crate::detail::DetailView;
use crate::facets::FacetPanel;
use crate::filter::Visibility;
use crate::frame::Frame;
use roadmap_model::EntryId;

/// Receives render instructions from the controller
///
/// Full [`render`](Presenter::render) calls follow structural changes; every
/// other method is an incremental update against the last rendered frame.
pub trait Presenter {
    /// Datasets are being fetched
    fn show_loading(&mut self);

    /// The startup load failed; the page has nothing to show
    fn show_load_failure(&mut self, message: &str);

    /// Draw a whole frame with its visibility and detail state
    fn render(&mut self, frame: &Frame, visibility: &Visibility, details: &DetailView);

    /// Show or hide entries, SKUs and separators
    fn update_visibility(&mut self, visibility: &Visibility, details: &DetailView);

    /// Refresh filter buttons and legend
    fn update_facets(&mut self, facets: &FacetPanel);

    /// Expand or collapse one entry
    fn set_expanded(&mut self, id: &EntryId, expanded: bool);

    /// Refresh spec panels, row selections and search highlights
    fn update_details(&mut self, details: &DetailView);

    /// Open or close an entry's add-link form
    fn show_link_form(&mut self, id: &EntryId, open: bool);

    /// Bring an entry into view
    fn scroll_into_view(&mut self, id: &EntryId);
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn show_loading(&mut self) {
        (**self).show_loading();
    }

    fn show_load_failure(&mut self, message: &str) {
        (**self).show_load_failure(message);
    }

    fn render(&mut self, frame: &Frame, visibility: &Visibility, details: &DetailView) {
        (**self).render(frame, visibility, details);
    }

    fn update_visibility(&mut self, visibility: &Visibility, details: &DetailView) {
        (**self).update_visibility(visibility, details);
    }

    fn update_facets(&mut self, facets: &FacetPanel) {
        (**self).update_facets(facets);
    }

    fn set_expanded(&mut self, id: &EntryId, expanded: bool) {
        (**self).set_expanded(id, expanded);
    }

    fn update_details(&mut self, details: &DetailView) {
        (**self).update_details(details);
    }

    fn show_link_form(&mut self, id: &EntryId, open: bool) {
        (**self).show_link_form(id, open);
    }

    fn scroll_into_view(&mut self, id: &EntryId) {
        (**self).scroll_into_view(id);
    }
}
