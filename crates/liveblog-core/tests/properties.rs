//! Property-based tests for the entry model
//!
//! - The derived type depends only on `replaces` and whether content is empty
//! - The key-event marker is found wherever it is embedded as a token

use liveblog_core::{Entry, EntryId, EntryType, FeedId, KeyEventMarker};
use proptest::prelude::*;

proptest! {
    #[test]
    fn entry_type_follows_pointer_and_content(
        content in "[a-z ]{0,12}",
        replaces in prop::option::of(1u64..50),
    ) {
        let mut entry = Entry::new(EntryId(100), FeedId(1), content.clone(), 0);
        entry.replaces = replaces.map(EntryId);

        let expected = match (replaces, content.is_empty()) {
            (None, _) => EntryType::New,
            (Some(_), true) => EntryType::Delete,
            (Some(_), false) => EntryType::Update,
        };
        prop_assert_eq!(entry.entry_type(), expected);
    }

    #[test]
    fn marker_found_between_words(
        prefix in "[a-z]{0,8}",
        suffix in "[a-z]{0,8}",
    ) {
        let marker = KeyEventMarker::default();
        let content = format!("{} /key {}", prefix, suffix);
        prop_assert!(marker.is_key_event(&content));
    }

    #[test]
    fn rendered_marker_always_counts(prefix in ".{0,16}") {
        let marker = KeyEventMarker::default();
        let content = format!("{}{}", prefix, marker.rendered);
        prop_assert!(marker.is_key_event(&content));
    }

    #[test]
    fn plain_words_are_not_key_events(words in "[a-z ]{0,24}") {
        let marker = KeyEventMarker::default();
        prop_assert!(!marker.is_key_event(&words));
    }
}
