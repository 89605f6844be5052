//! User notes and links keyed by vendor and entry
//!
//! Storage is best-effort: backend failures are logged at debug level and
//! otherwise ignored. Every write also lands in an in-memory overlay, so the
//! current session sees its own writes even when the backend rejects them.

use crate::kv::{KeyValueStore, MemoryStore};
use roadmap_model::{Entry, EntryId, LinkInputError, LinkRecord, Vendor};
use std::collections::HashMap;
use tracing::debug;

/// Notes and links persistence over a key-value backend
#[derive(Debug)]
pub struct PersistenceLayer {
    backend: Box<dyn KeyValueStore>,
    /// Session writes; `None` marks a removal
    overlay: HashMap<String, Option<String>>,
}

impl Default for PersistenceLayer {
    fn default() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl PersistenceLayer {
    /// Create layer over a backend
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    /// Create layer over an already boxed backend
    #[must_use]
    pub fn from_boxed(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            overlay: HashMap::new(),
        }
    }

    /// Storage key for an entry's notes
    #[must_use]
    pub fn notes_key(vendor: Vendor, entry_id: &EntryId) -> String {
        format!("roadmap-notes-{vendor}-{entry_id}")
    }

    /// Storage key for an entry's links
    #[must_use]
    pub fn links_key(vendor: Vendor, entry_id: &EntryId) -> String {
        format!("roadmap-links-{vendor}-{entry_id}")
    }

    fn read(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overlay.get(key) {
            return value.clone();
        }
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                debug!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    fn write(&mut self, key: String, value: String) {
        if let Err(e) = self.backend.set(&key, &value) {
            debug!(key = %key, error = %e, "storage write failed, keeping value for this session");
        }
        self.overlay.insert(key, Some(value));
    }

    fn erase(&mut self, key: String) {
        if let Err(e) = self.backend.remove(&key) {
            debug!(key = %key, error = %e, "storage remove failed");
        }
        self.overlay.insert(key, None);
    }

    /// Save notes text for an entry
    pub fn save_notes(&mut self, vendor: Vendor, entry_id: &EntryId, text: &str) {
        self.write(Self::notes_key(vendor, entry_id), text.to_string());
    }

    /// Notes for an entry; empty if none were saved
    #[must_use]
    pub fn load_notes(&self, vendor: Vendor, entry_id: &EntryId) -> String {
        self.read(&Self::notes_key(vendor, entry_id)).unwrap_or_default()
    }

    /// Links for an entry
    ///
    /// Saved links win, including an explicitly saved empty list. Otherwise
    /// the entry's default links, otherwise none. Unreadable saved links
    /// count as never saved.
    #[must_use]
    pub fn get_links(&self, vendor: Vendor, entry: &Entry) -> Vec<LinkRecord> {
        let key = Self::links_key(vendor, &entry.id);
        if let Some(raw) = self.read(&key) {
            match serde_json::from_str::<Vec<LinkRecord>>(&raw) {
                Ok(links) => return links,
                Err(e) => debug!(key = %key, error = %e, "stored links are corrupt, using defaults"),
            }
        }
        entry.default_links.clone().unwrap_or_default()
    }

    /// Save the full link list for an entry
    pub fn save_links(&mut self, vendor: Vendor, entry_id: &EntryId, links: &[LinkRecord]) {
        match serde_json::to_string(links) {
            Ok(json) => self.write(Self::links_key(vendor, entry_id), json),
            Err(e) => debug!(entry = %entry_id, error = %e, "failed to encode links"),
        }
    }

    /// Forget saved links so the entry's defaults apply again
    pub fn reset_links(&mut self, vendor: Vendor, entry_id: &EntryId) {
        self.erase(Self::links_key(vendor, entry_id));
    }

    /// Normalize and append a link, returning the new list
    ///
    /// # Errors
    /// `LinkInputError::EmptyUrl` if the URL is blank; nothing is saved
    pub fn add_link(
        &mut self,
        vendor: Vendor,
        entry: &Entry,
        label: &str,
        url: &str,
    ) -> Result<Vec<LinkRecord>, LinkInputError> {
        let link = LinkRecord::from_input(label, url)?;
        let mut links = self.get_links(vendor, entry);
        links.push(link);
        self.save_links(vendor, &entry.id, &links);
        Ok(links)
    }

    /// Remove the link at `index`, returning the resulting list
    ///
    /// An out-of-range index changes nothing.
    pub fn remove_link(&mut self, vendor: Vendor, entry: &Entry, index: usize) -> Vec<LinkRecord> {
        let mut links = self.get_links(vendor, entry);
        if index < links.len() {
            links.remove(index);
            self.save_links(vendor, &entry.id, &links);
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded { limit: 0 })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
    }

    fn zen1() -> Entry {
        Entry::generation("zen1", "Zen", "2017")
            .with_default_links(vec![LinkRecord::new("WikiChip", "https://en.wikichip.org/wiki/amd/microarchitectures/zen")])
    }

    #[test]
    fn keys_follow_vendor_and_id() {
        let id = EntryId::from("zen4");
        assert_eq!(PersistenceLayer::notes_key(Vendor::Amd, &id), "roadmap-notes-amd-zen4");
        assert_eq!(PersistenceLayer::links_key(Vendor::Amd, &id), "roadmap-links-amd-zen4");
    }

    #[test]
    fn notes_default_to_empty() {
        let layer = PersistenceLayer::default();
        assert_eq!(layer.load_notes(Vendor::Intel, &EntryId::from("meteor-lake")), "");
    }

    #[test]
    fn notes_are_scoped_by_vendor() {
        let mut layer = PersistenceLayer::default();
        let id = EntryId::from("shared");
        layer.save_notes(Vendor::Amd, &id, "amd note");
        assert_eq!(layer.load_notes(Vendor::Amd, &id), "amd note");
        assert_eq!(layer.load_notes(Vendor::Intel, &id), "");
    }

    #[test]
    fn defaults_until_links_are_saved_even_if_empty() {
        let mut layer = PersistenceLayer::default();
        let entry = zen1();
        assert_eq!(layer.get_links(Vendor::Amd, &entry).len(), 1);

        layer.save_links(Vendor::Amd, &entry.id, &[]);
        assert!(layer.get_links(Vendor::Amd, &entry).is_empty());

        layer.reset_links(Vendor::Amd, &entry.id);
        assert_eq!(layer.get_links(Vendor::Amd, &entry).len(), 1);
    }

    #[test]
    fn add_link_appends_to_defaults() {
        let mut layer = PersistenceLayer::default();
        let entry = zen1();
        let links = layer
            .add_link(Vendor::Amd, &entry, "", "example.com/page")
            .unwrap();
        assert_eq!(
            links.last(),
            Some(&LinkRecord::new("example.com/page", "https://example.com/page"))
        );
        assert_eq!(layer.get_links(Vendor::Amd, &entry), links);
    }

    #[test]
    fn empty_url_leaves_links_untouched() {
        let mut layer = PersistenceLayer::default();
        let entry = zen1();
        assert_eq!(
            layer.add_link(Vendor::Amd, &entry, "label", "  "),
            Err(LinkInputError::EmptyUrl)
        );
        assert!(!layer
            .backend
            .contains(&PersistenceLayer::links_key(Vendor::Amd, &entry.id))
            .unwrap());
    }

    #[test]
    fn remove_link_out_of_range_is_noop() {
        let mut layer = PersistenceLayer::default();
        let entry = zen1();
        assert_eq!(layer.remove_link(Vendor::Amd, &entry, 5).len(), 1);
        assert!(layer.remove_link(Vendor::Amd, &entry, 0).is_empty());
    }

    #[test]
    fn broken_backend_keeps_session_writes() {
        let mut layer = PersistenceLayer::new(BrokenStore);
        let entry = zen1();
        assert_eq!(layer.load_notes(Vendor::Amd, &entry.id), "");
        assert_eq!(layer.get_links(Vendor::Amd, &entry).len(), 1);

        layer.save_notes(Vendor::Amd, &entry.id, "still here");
        layer.save_links(Vendor::Amd, &entry.id, &[]);

        assert_eq!(layer.load_notes(Vendor::Amd, &entry.id), "still here");
        assert!(layer.get_links(Vendor::Amd, &entry).is_empty());
    }

    #[test]
    fn corrupt_links_fall_back_to_defaults() {
        let store = MemoryStore::new();
        store.set("roadmap-links-amd-zen1", "{oops").unwrap();
        let layer = PersistenceLayer::new(store);
        assert_eq!(layer.get_links(Vendor::Amd, &zen1()).len(), 1);
    }
}
