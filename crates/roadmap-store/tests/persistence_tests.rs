use pretty_assertions::assert_eq;
use proptest::prelude::*;
use roadmap_model::{Entry, EntryId, LinkRecord, Vendor};
use roadmap_store::{JsonFileStore, KeyValueStore, MemoryStore, PersistenceLayer};

fn entry_with_defaults(defaults: Option<Vec<LinkRecord>>) -> Entry {
    let entry = Entry::generation("zen4", "Zen 4", "2022");
    match defaults {
        Some(links) => entry.with_default_links(links),
        None => entry,
    }
}

fn link_strategy() -> impl Strategy<Value = LinkRecord> {
    ("[A-Za-z0-9 ]{0,12}", "https://[a-z]{1,10}\\.com/[a-z]{0,6}")
        .prop_map(|(label, url)| LinkRecord::new(label, url))
}

proptest! {
    /// Saved links read back exactly
    #[test]
    fn prop_saved_links_round_trip(links in prop::collection::vec(link_strategy(), 0..6)) {
        let mut layer = PersistenceLayer::default();
        let entry = entry_with_defaults(Some(vec![LinkRecord::new("d", "https://d.example")]));

        layer.save_links(Vendor::Amd, &entry.id, &links);
        prop_assert_eq!(layer.get_links(Vendor::Amd, &entry), links);
    }

    /// Never-saved links are the defaults, or empty
    #[test]
    fn prop_unsaved_links_are_defaults(
        defaults in prop::option::of(prop::collection::vec(link_strategy(), 0..4))
    ) {
        let layer = PersistenceLayer::default();
        let entry = entry_with_defaults(defaults.clone());
        prop_assert_eq!(layer.get_links(Vendor::Amd, &entry), defaults.unwrap_or_default());
    }
}

/// Notes and links written through a file store survive a new session
#[test]
fn file_backed_annotations_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annotations.json");
    let entry = entry_with_defaults(None);

    {
        let mut layer = PersistenceLayer::new(JsonFileStore::open(&path).unwrap());
        layer.save_notes(Vendor::Amd, &entry.id, "Chiplet IO die");
        layer
            .add_link(Vendor::Amd, &entry, "Die shot", "example.com/zen4")
            .unwrap();
    }

    let layer = PersistenceLayer::new(JsonFileStore::open(&path).unwrap());
    assert_eq!(layer.load_notes(Vendor::Amd, &entry.id), "Chiplet IO die");
    assert_eq!(
        layer.get_links(Vendor::Amd, &entry),
        vec![LinkRecord::new("Die shot", "https://example.com/zen4")]
    );
}

/// Writes over quota are kept for the session only
#[test]
fn quota_failure_keeps_session_value() {
    let backend = MemoryStore::with_quota(8);
    let mut layer = PersistenceLayer::new(backend.clone());
    let id = EntryId::from("zen5");

    layer.save_notes(Vendor::Amd, &id, "a note far longer than the quota allows");

    assert_eq!(
        layer.load_notes(Vendor::Amd, &id),
        "a note far longer than the quota allows"
    );
    assert!(backend.is_empty());
    assert!(!backend.contains("roadmap-notes-amd-zen5").unwrap());
}
