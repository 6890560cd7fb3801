//! Property-based tests for the reconciliation views
//!
//! These tests verify:
//! - Resolution is a pure filter: resolving twice changes nothing
//! - Pagination covers the compacted feed exactly once, in order
//! - Jumping to any compacted slot lands on a page that contains it
//! - A replayed delete always empties its slot

use liveblog_core::{Entry, EntryId, FeedId};
use liveblog_reconcile::{flatten, paginate, resolve, CompactedEntry, PageRequest};
use proptest::prelude::*;

/// Random logs: each record is new, or replaces some earlier id with content
/// that may be empty (tombstone).
fn log_strategy() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec((any::<bool>(), 0usize..64, "[a-c]{0,2}"), 0..40).prop_map(|specs| {
        let mut entries: Vec<Entry> = Vec::new();
        for (i, (replaces, target, content)) in specs.into_iter().enumerate() {
            let id = i as u64 + 1;
            let mut entry = Entry::new(EntryId(id), FeedId(1), content, id as i64);
            if replaces && id > 1 {
                entry.replaces = Some(EntryId(target as u64 % (id - 1) + 1));
            } else if entry.content.is_empty() {
                entry.content = "x".to_string();
            }
            entries.push(entry);
        }
        entries
    })
}

fn compacted_strategy() -> impl Strategy<Value = Vec<CompactedEntry>> {
    log_strategy().prop_map(flatten)
}

proptest! {
    #[test]
    fn resolution_is_idempotent(log in log_strategy()) {
        let once = resolve(log, None);
        let twice = resolve(once.values().cloned().collect::<Vec<_>>(), None);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn resolution_never_invents_entries(log in log_strategy()) {
        let resolved = resolve(log.clone(), None);
        for (id, entry) in &resolved {
            prop_assert!(log.iter().any(|e| e.id == *id && e == entry));
        }
    }

    #[test]
    fn pages_cover_sequence_exactly_once(
        compacted in compacted_strategy(),
        per_page in 1usize..7,
    ) {
        let first = paginate(&compacted, &PageRequest::new(per_page));
        prop_assert_eq!(first.pages, compacted.len().div_ceil(per_page));
        prop_assert_eq!(first.total, compacted.len());

        let mut joined = Vec::new();
        for page in 1..=first.pages {
            joined.extend(paginate(&compacted, &PageRequest::new(per_page).page(page)).items);
        }
        prop_assert_eq!(joined, compacted);
    }

    #[test]
    fn jump_to_lands_on_containing_page(
        compacted in compacted_strategy(),
        per_page in 1usize..7,
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!compacted.is_empty());
        let target = compacted[pick.index(compacted.len())].key;

        let page = paginate(&compacted, &PageRequest::new(per_page).jump_to(target));
        prop_assert!(page.items.iter().any(|c| c.key == target));
    }

    #[test]
    fn delete_empties_slot_regardless_of_updates(updates in 0usize..6) {
        let mut log = vec![Entry::new(EntryId(1), FeedId(1), "v0", 1)];
        for i in 0..updates {
            let id = i as u64 + 2;
            log.push(Entry::new(EntryId(id), FeedId(1), format!("v{}", id), id as i64).replacing(EntryId(1)));
        }
        let last = log.len() as u64 + 1;
        log.push(Entry::new(EntryId(last), FeedId(1), "", last as i64).replacing(EntryId(1)));

        prop_assert!(flatten(log).is_empty());
    }
}
