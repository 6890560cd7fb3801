//! Property-based tests for archive repair
//!
//! These tests verify:
//! - Feeds written by the sequential write protocol need no repair
//! - A dry run never changes the store, even when it would rewrite content
//! - Duplicates that don't match the relink count never trigger a rewrite
//! - Repair is idempotent: a second run plans nothing

use liveblog_core::{Entry, EntryId, FeedId};
use liveblog_repair::{ArchiveRepair, RepairConfig, RepairReport};
use liveblog_store::{FeedWriter, MemoryRecordStore, RecordStore};
use proptest::prelude::*;

const FEED: FeedId = FeedId(1);

/// Arbitrary, possibly corrupted archives: gaps in ids, pointers anywhere.
fn archive_strategy() -> impl Strategy<Value = MemoryRecordStore> {
    prop::collection::vec(
        (any::<bool>(), prop::option::of(1u64..24), "[abc]{0,1}"),
        0..20,
    )
    .prop_map(|specs| {
        let entries = specs
            .into_iter()
            .enumerate()
            .filter(|(_, (keep, _, _))| *keep)
            .map(|(i, (_, replaces, content))| {
                let id = i as u64 + 1;
                let mut entry = Entry::new(EntryId(id), FEED, content, id as i64);
                entry.replaces = replaces.map(EntryId);
                if entry.replaces.is_none() && entry.content.is_empty() {
                    entry.content = "z".into();
                }
                entry
            });
        MemoryRecordStore::with_entries(entries).unwrap()
    })
}

/// Distinct originals, then one notification with a drifted pointer whose
/// content also sits on a later entry: one relink, one duplicate pair.
fn drifted_strategy() -> impl Strategy<Value = MemoryRecordStore> {
    (1u64..8, "[a-d]{1,3}").prop_map(|(originals, edit)| {
        let edit = format!("edit {}", edit);
        let mut entries: Vec<Entry> = (1..=originals)
            .map(|id| Entry::new(EntryId(id), FEED, format!("original {}", id), id as i64))
            .collect();
        let notification = originals + 1;
        entries.push(
            Entry::new(EntryId(notification), FEED, edit.clone(), notification as i64)
                .replacing(EntryId(notification + 100)),
        );
        entries.push(Entry::new(EntryId(notification + 1), FEED, edit, notification as i64 + 1));
        MemoryRecordStore::with_entries(entries).unwrap()
    })
}

#[derive(Clone, Debug)]
enum Edit {
    Insert(String),
    Update(usize, String),
    Delete(usize),
}

fn edits_strategy() -> impl Strategy<Value = Vec<Edit>> {
    prop::collection::vec(
        prop_oneof![
            "[a-d]{1,3}".prop_map(Edit::Insert),
            (0usize..8, "[a-d]{1,3}").prop_map(|(i, c)| Edit::Update(i, c)),
            (0usize..8).prop_map(Edit::Delete),
        ],
        0..30,
    )
}

proptest! {
    #[test]
    fn written_feeds_need_no_repair(edits in edits_strategy()) {
        let mut store = MemoryRecordStore::new();
        let writer = FeedWriter::new();
        let mut live: Vec<EntryId> = Vec::new();

        for (ts, edit) in edits.iter().enumerate() {
            let ts = ts as i64;
            match edit {
                Edit::Insert(content) => {
                    live.push(writer.insert(&mut store, FEED, content, None, ts).unwrap());
                }
                Edit::Update(i, content) if !live.is_empty() => {
                    let target = live[i % live.len()];
                    writer.update(&mut store, FEED, target, content, None, ts).unwrap();
                }
                Edit::Delete(i) if !live.is_empty() => {
                    let target = live.remove(i % live.len());
                    writer.delete(&mut store, FEED, target, None, ts).unwrap();
                }
                _ => {}
            }
        }

        let plan = ArchiveRepair::default().plan(&store, FEED).unwrap();
        prop_assert!(plan.is_empty(), "unexpected plan: {:?}", plan);
    }

    #[test]
    fn dry_run_never_writes(mut store in archive_strategy()) {
        let before = store.to_json().unwrap();
        ArchiveRepair::new(RepairConfig::dry_run()).repair_all(&mut store).unwrap();
        prop_assert_eq!(store.to_json().unwrap(), before);
    }

    #[test]
    fn dry_run_never_writes_planned_rewrites(mut store in drifted_strategy()) {
        let before = store.to_json().unwrap();
        let report = ArchiveRepair::new(RepairConfig::dry_run())
            .repair_feed(&mut store, FEED)
            .unwrap();

        prop_assert_eq!(report, RepairReport { entries_corrected: 1, content_replaced: 1 });
        prop_assert_eq!(store.to_json().unwrap(), before);
    }

    #[test]
    fn unmatched_duplicates_never_rewrite(
        mut store in drifted_strategy(),
        extra in 1u64..4,
    ) {
        // Healthy edits add duplicate pairs the single relink can't account for.
        let first = store.len() as u64 + 1;
        for i in 0..extra {
            let id = first + 2 * i;
            store.put(Entry::new(EntryId(id), FEED, format!("healthy {}", i), id as i64)).unwrap();
            store
                .put(
                    Entry::new(EntryId(id + 1), FEED, format!("healthy {}", i), id as i64 + 1)
                        .replacing(EntryId(id)),
                )
                .unwrap();
        }

        let report = ArchiveRepair::new(RepairConfig::apply())
            .repair_feed(&mut store, FEED)
            .unwrap();
        prop_assert_eq!(report.entries_corrected, 1);
        prop_assert_eq!(report.content_replaced, 0);
    }

    #[test]
    fn repair_is_idempotent(mut store in archive_strategy()) {
        let repair = ArchiveRepair::new(RepairConfig::apply());
        let first = repair.repair_all(&mut store).unwrap();
        let second = repair.repair_all(&mut store).unwrap();

        prop_assert!(second.total().is_clean(), "first {:?}, second {:?}", first, second);
    }
}
