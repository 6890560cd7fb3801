//! Integration tests for the editor write protocol.
//!
//! These tests verify that after any sequence of sequential (non-racing) edits:
//! - Every update notification points at an original that still exists
//! - Every tombstone points at an original that no longer exists
//! - Originals carry the content of their latest notification

use liveblog_core::{Entry, EntryId, EntryType, FeedId};
use liveblog_store::{ApprovalFilter, FeedWriter, MemoryRecordStore, QueryOptions, RecordStore};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Action {
    Insert(String),
    Update(usize, String),
    Delete(usize),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(Action::Insert),
        (0usize..8, "[a-z]{1,6}").prop_map(|(i, c)| Action::Update(i, c)),
        (0usize..8).prop_map(Action::Delete),
    ]
}

fn feed_entries(store: &MemoryRecordStore, feed: FeedId) -> Vec<Entry> {
    store
        .query(feed, &QueryOptions::ascending().approval(ApprovalFilter::All))
        .unwrap()
}

fn run(actions: &[Action]) -> MemoryRecordStore {
    let mut store = MemoryRecordStore::new();
    let writer = FeedWriter::new();
    let feed = FeedId(1);
    let mut live: Vec<EntryId> = Vec::new();

    for (ts, action) in actions.iter().enumerate() {
        let ts = ts as i64;
        match action {
            Action::Insert(content) => {
                live.push(writer.insert(&mut store, feed, content, None, ts).unwrap());
            }
            Action::Update(i, content) if !live.is_empty() => {
                let target = live[i % live.len()];
                writer.update(&mut store, feed, target, content, None, ts).unwrap();
            }
            Action::Delete(i) if !live.is_empty() => {
                let target = live.remove(i % live.len());
                writer.delete(&mut store, feed, target, None, ts).unwrap();
            }
            _ => {}
        }
    }
    store
}

proptest! {
    #[test]
    fn pointers_match_entry_types(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let store = run(&actions);

        for entry in feed_entries(&store, FeedId(1)) {
            match entry.entry_type() {
                EntryType::New => {}
                EntryType::Update => {
                    let target = entry.replaces.unwrap();
                    prop_assert!(store.get(target).unwrap().is_some());
                }
                EntryType::Delete => {
                    let target = entry.replaces.unwrap();
                    prop_assert!(store.get(target).unwrap().is_none());
                }
            }
        }
    }

    #[test]
    fn originals_carry_latest_content(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let store = run(&actions);

        let mut latest: HashMap<EntryId, String> = HashMap::new();
        for entry in feed_entries(&store, FeedId(1)) {
            if entry.entry_type() == EntryType::Update {
                latest.insert(entry.replaces.unwrap(), entry.content.clone());
            }
        }
        for (original, content) in latest {
            prop_assert_eq!(store.get(original).unwrap().unwrap().content, content);
        }
    }
}

#[test]
fn delete_leaves_only_tombstone_for_slot() {
    let store = run(&[
        Action::Insert("a".into()),
        Action::Update(0, "b".into()),
        Action::Update(0, "c".into()),
        Action::Delete(0),
    ]);

    let entries = feed_entries(&store, FeedId(1));
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_tombstone());
}
