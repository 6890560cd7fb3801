//! Archive repair for feeds corrupted by racing edits.
//!
//! Repair runs in two phases, like any offline maintenance pass:
//! [`ArchiveRepair::plan`] reads a feed and decides what to fix, and
//! [`ArchiveRepair::apply`] performs those writes. A dry run stops
//! after planning.
//!
//! Pointer repair: every entry that replaces something should name an entry
//! that replaces nothing. One that doesn't is relinked to the closest such
//! entry created before it. Tombstones of entries that are already gone,
//! and updates left behind by such a delete, are consistent and left alone.
//!
//! Content repair: a content string found on exactly two entries is the
//! trace of an edit whose in-place rewrite landed but whose pointer didn't.
//! When the number of such clusters equals the number of relinked entries,
//! clusters and relinks are paired in ascending id order and each relinked
//! original takes its cluster's content. When the counts differ the pairing
//! can't be trusted and content repair is skipped for the whole feed.
//!
//! Pairing goes by id order alone; nothing checks that a cluster belongs to
//! the relink it is paired with.

use crate::error::{RepairError, Result};
use crate::plan::{RepairAction, RepairPlan};
use crate::report::{BatchReport, RepairReport};
use liveblog_core::{Entry, EntryId, FeedId};
use liveblog_store::{ApprovalFilter, EntryPatch, QueryOptions, RecordStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Repair run settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Plan and report, but write nothing.
    pub dry_run: bool,
}

impl RepairConfig {
    pub fn dry_run() -> Self {
        RepairConfig { dry_run: true }
    }

    pub fn apply() -> Self {
        RepairConfig { dry_run: false }
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self::dry_run()
    }
}

/// Plans and applies archive repairs.
#[derive(Clone, Debug, Default)]
pub struct ArchiveRepair {
    config: RepairConfig,
}

impl ArchiveRepair {
    pub fn new(config: RepairConfig) -> Self {
        ArchiveRepair { config }
    }

    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Decide what repairing `feed` would change.
    ///
    /// This doesn't modify the store.
    pub fn plan<S: RecordStore>(&self, store: &S, feed: FeedId) -> Result<RepairPlan> {
        let mut entries = store.query(feed, &QueryOptions::new().approval(ApprovalFilter::All))?;
        entries.sort_by_key(|e| e.id);

        let mut plan = RepairPlan::new(feed);
        let relinks = plan_relinks(&entries, &mut plan);
        plan_content(&entries, &relinks, &mut plan);

        debug!(
            feed = %feed,
            actions = plan.actions.len(),
            content_skipped = plan.content_skipped,
            "Planned archive repair"
        );
        Ok(plan)
    }

    /// Execute a plan produced by [`plan`](Self::plan), ignoring `dry_run`.
    ///
    /// Entries that disappeared since planning are skipped; the report counts
    /// only the writes that happened.
    pub fn apply<S: RecordStore>(&self, store: &mut S, plan: &RepairPlan) -> Result<RepairReport> {
        let mut report = RepairReport::default();

        for action in &plan.actions {
            let (entry, patch) = match action {
                RepairAction::Relink { entry, to, .. } => {
                    (*entry, EntryPatch::new().replaces(Some(*to)))
                }
                RepairAction::ReplaceContent { entry, content, .. } => {
                    (*entry, EntryPatch::new().content(content.clone()))
                }
            };

            let Some(current) = store.get(entry)? else {
                warn!(feed = %plan.feed, entry = %entry, "Entry vanished since planning, skipping");
                continue;
            };
            if current.feed_id != plan.feed {
                return Err(RepairError::WrongFeed {
                    plan: plan.feed,
                    feed: current.feed_id,
                });
            }

            debug!(feed = %plan.feed, "{}", action);
            match store.update(entry, patch) {
                Ok(()) => {}
                Err(StoreError::NotFound(_)) => {
                    warn!(feed = %plan.feed, entry = %entry, "Entry vanished since planning, skipping");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            match action {
                RepairAction::Relink { .. } => report.entries_corrected += 1,
                RepairAction::ReplaceContent { .. } => report.content_replaced += 1,
            }
        }

        Ok(report)
    }

    /// Plan `feed` and, unless running dry, apply the plan.
    pub fn repair_feed<S: RecordStore>(&self, store: &mut S, feed: FeedId) -> Result<RepairReport> {
        let plan = self.plan(store, feed)?;
        let report = plan.report();

        if self.config.dry_run || plan.is_empty() {
            info!(
                feed = %feed,
                dry_run = self.config.dry_run,
                entries_corrected = report.entries_corrected,
                content_replaced = report.content_replaced,
                "Archive repair planned"
            );
            return Ok(report);
        }

        let report = self.apply(store, &plan)?;
        info!(
            feed = %feed,
            entries_corrected = report.entries_corrected,
            content_replaced = report.content_replaced,
            "Archive repair applied"
        );
        Ok(report)
    }

    /// Repair every feed the store knows about.
    pub fn repair_all<S: RecordStore>(&self, store: &mut S) -> Result<BatchReport> {
        let mut batch = BatchReport {
            dry_run: self.config.dry_run,
            feeds: Vec::new(),
        };

        for feed in store.feeds()? {
            let report = self.repair_feed(store, feed)?;
            batch.feeds.push((feed, report));
        }

        let total = batch.total();
        info!(
            feeds = batch.feeds.len(),
            entries_corrected = total.entries_corrected,
            content_replaced = total.content_replaced,
            dry_run = self.config.dry_run,
            "Archive repair finished"
        );
        Ok(batch)
    }
}

/// Relink suspects. Returns each relinked entry with its new target, in
/// ascending id order.
fn plan_relinks(entries: &[Entry], plan: &mut RepairPlan) -> Vec<(EntryId, EntryId)> {
    let present: BTreeSet<EntryId> = entries.iter().map(|e| e.id).collect();
    let plausible: BTreeSet<EntryId> = entries
        .iter()
        .filter(|e| e.replaces.is_none())
        .map(|e| e.id)
        .collect();
    let tombstoned: BTreeSet<EntryId> = entries
        .iter()
        .filter(|e| e.is_tombstone())
        .filter_map(|e| e.replaces)
        .collect();

    let mut relinks = Vec::new();
    for entry in entries {
        let Some(target) = entry.replaces else {
            continue;
        };
        if plausible.contains(&target) {
            continue;
        }
        // Left over from a delete of `target`.
        if !present.contains(&target) && (entry.is_tombstone() || tombstoned.contains(&target)) {
            continue;
        }

        match plausible.range(..entry.id).next_back() {
            Some(&to) => {
                relinks.push((entry.id, to));
                plan.actions.push(RepairAction::Relink {
                    entry: entry.id,
                    from: target,
                    to,
                });
            }
            None => warn!(
                feed = %plan.feed,
                entry = %entry.id,
                replaces = %target,
                "No earlier original to relink to"
            ),
        }
    }

    relinks
}

fn plan_content(entries: &[Entry], relinks: &[(EntryId, EntryId)], plan: &mut RepairPlan) {
    if relinks.is_empty() {
        return;
    }

    let mut holders: HashMap<&str, Vec<EntryId>> = HashMap::new();
    for entry in entries {
        holders.entry(entry.content.as_str()).or_default().push(entry.id);
    }

    // Content shared by exactly two entries, ordered by the lower id.
    let mut clusters: Vec<(EntryId, &str)> = holders
        .iter()
        .filter(|(_, ids)| ids.len() == 2)
        .map(|(content, ids)| (ids[0], *content))
        .collect();
    clusters.sort();

    if clusters.len() != relinks.len() {
        warn!(
            feed = %plan.feed,
            relinked = relinks.len(),
            clusters = clusters.len(),
            "Skipping content repair, duplicate count doesn't match"
        );
        plan.content_skipped = true;
        return;
    }

    let by_id: BTreeMap<EntryId, &Entry> = entries.iter().map(|e| (e.id, e)).collect();
    let mut rewrites: Vec<RepairAction> = relinks
        .iter()
        .zip(&clusters)
        .filter_map(|(&(_, target), &(source, content))| {
            let original = by_id.get(&target)?;
            (original.content != content).then(|| RepairAction::ReplaceContent {
                entry: target,
                source,
                content: content.to_string(),
            })
        })
        .collect();
    rewrites.sort_by_key(|action| match action {
        RepairAction::ReplaceContent { entry, .. } | RepairAction::Relink { entry, .. } => *entry,
    });
    plan.actions.extend(rewrites);
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveblog_store::MemoryRecordStore;

    const FEED: FeedId = FeedId(1);

    fn entry(id: u64, content: &str) -> Entry {
        Entry::new(EntryId(id), FEED, content, id as i64 * 10)
    }

    fn store(entries: Vec<Entry>) -> MemoryRecordStore {
        MemoryRecordStore::with_entries(entries).unwrap()
    }

    fn replaces(store: &MemoryRecordStore, id: u64) -> Option<EntryId> {
        store.get(EntryId(id)).unwrap().unwrap().replaces
    }

    fn content(store: &MemoryRecordStore, id: u64) -> String {
        store.get(EntryId(id)).unwrap().unwrap().content
    }

    #[test]
    fn test_consistent_feed_is_untouched() {
        let mut store = store(vec![
            entry(1, "Match starts!"),
            entry(2, "Match starts!").replacing(EntryId(1)),
            entry(3, "Goal"),
            entry(4, "").replacing(EntryId(5)),
        ]);

        let report = ArchiveRepair::new(RepairConfig::apply())
            .repair_feed(&mut store, FEED)
            .unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_relinks_to_closest_earlier_original() {
        let mut store = store(vec![
            entry(1, "Kick-off"),
            entry(3, "Half-time"),
            entry(4, "Half-time").replacing(EntryId(9)),
            entry(5, "Goal"),
        ]);

        let report = ArchiveRepair::new(RepairConfig::apply())
            .repair_feed(&mut store, FEED)
            .unwrap();

        assert_eq!(report.entries_corrected, 1);
        assert_eq!(replaces(&store, 4), Some(EntryId(3)));
    }

    #[test]
    fn test_pointer_at_update_is_relinked() {
        let mut store = store(vec![
            entry(1, "v1"),
            entry(2, "v1").replacing(EntryId(1)),
            entry(3, "v2").replacing(EntryId(2)),
        ]);

        let plan = ArchiveRepair::default().plan(&store, FEED).unwrap();
        assert_eq!(
            plan.actions,
            vec![RepairAction::Relink { entry: EntryId(3), from: EntryId(2), to: EntryId(1) }]
        );

        ArchiveRepair::new(RepairConfig::apply())
            .apply(&mut store, &plan)
            .unwrap();
        assert_eq!(replaces(&store, 3), Some(EntryId(1)));
        // The one duplicate pair already matches the relinked original.
        assert_eq!(content(&store, 1), "v1");
    }

    #[test]
    fn test_delete_leftovers_are_not_relinked() {
        // Original 2 deleted: tombstone 4 and orphan update 3 remain.
        let store = store(vec![
            entry(1, "Kick-off"),
            entry(3, "edit").replacing(EntryId(2)),
            entry(4, "").replacing(EntryId(2)),
        ]);

        let plan = ArchiveRepair::default().plan(&store, FEED).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_duplicates_without_relinks_are_left_alone() {
        // Racing edits of 1 with intact pointers: "v2" sits on two entries
        // but nothing was relinked, so there is nothing to pair it with.
        let mut store = store(vec![
            entry(1, "v2"),
            entry(2, "v2").replacing(EntryId(1)),
            entry(3, "v3").replacing(EntryId(1)),
        ]);

        let plan = ArchiveRepair::default().plan(&store, FEED).unwrap();
        assert!(plan.is_empty());
        assert!(!plan.content_skipped);

        let report = ArchiveRepair::new(RepairConfig::apply())
            .repair_feed(&mut store, FEED)
            .unwrap();
        assert_eq!(report, RepairReport::default());
        assert_eq!(content(&store, 1), "v2");
    }

    #[test]
    fn test_matching_duplicate_restores_relinked_original() {
        let mut store = store(vec![
            entry(1, "Kick-off"),
            entry(2, "Goal"),
            entry(3, "Goal, 1-0").replacing(EntryId(9)),
            entry(4, "Goal, 1-0"),
        ]);

        let plan = ArchiveRepair::default().plan(&store, FEED).unwrap();
        assert_eq!(
            plan.actions,
            vec![
                RepairAction::Relink { entry: EntryId(3), from: EntryId(9), to: EntryId(2) },
                RepairAction::ReplaceContent {
                    entry: EntryId(2),
                    source: EntryId(3),
                    content: "Goal, 1-0".into(),
                },
            ]
        );

        let report = ArchiveRepair::new(RepairConfig::apply())
            .apply(&mut store, &plan)
            .unwrap();
        assert_eq!(report, RepairReport { entries_corrected: 1, content_replaced: 1 });
        assert_eq!(content(&store, 2), "Goal, 1-0");
        assert_eq!(content(&store, 1), "Kick-off");
    }

    #[test]
    fn test_duplicates_pair_with_relinks_in_id_order() {
        let mut store = store(vec![
            entry(1, "A"),
            entry(2, "B"),
            entry(3, "x1").replacing(EntryId(90)),
            entry(4, "x1"),
            entry(5, "C"),
            entry(6, "x2").replacing(EntryId(91)),
            entry(7, "x2"),
        ]);

        let report = ArchiveRepair::new(RepairConfig::apply())
            .repair_feed(&mut store, FEED)
            .unwrap();

        assert_eq!(report, RepairReport { entries_corrected: 2, content_replaced: 2 });
        assert_eq!(replaces(&store, 3), Some(EntryId(2)));
        assert_eq!(replaces(&store, 6), Some(EntryId(5)));
        assert_eq!(content(&store, 2), "x1");
        assert_eq!(content(&store, 5), "x2");
        assert_eq!(content(&store, 1), "A");
    }

    #[test]
    fn test_duplicate_count_mismatch_skips_content() {
        // One relink, two duplicate pairs from healthy edits.
        let mut store = store(vec![
            entry(1, "Kick-off"),
            entry(2, "Goal").replacing(EntryId(9)),
            entry(3, "Half-time"),
            entry(4, "Half-time").replacing(EntryId(3)),
            entry(5, "Full-time"),
            entry(6, "Full-time").replacing(EntryId(5)),
        ]);

        let plan = ArchiveRepair::default().plan(&store, FEED).unwrap();
        assert!(plan.content_skipped);
        assert_eq!(plan.report(), RepairReport { entries_corrected: 1, content_replaced: 0 });

        let report = ArchiveRepair::new(RepairConfig::apply())
            .repair_feed(&mut store, FEED)
            .unwrap();
        assert_eq!(report.content_replaced, 0);
        assert_eq!(replaces(&store, 2), Some(EntryId(1)));
        assert_eq!(content(&store, 1), "Kick-off");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut store = store(vec![
            entry(1, "v1"),
            entry(2, "v2").replacing(EntryId(8)),
            entry(3, "v2"),
        ]);
        let before = store.to_json().unwrap();

        let report = ArchiveRepair::new(RepairConfig::dry_run())
            .repair_feed(&mut store, FEED)
            .unwrap();

        assert_eq!(report, RepairReport { entries_corrected: 1, content_replaced: 1 });
        assert_eq!(store.to_json().unwrap(), before);
    }

    #[test]
    fn test_apply_skips_entries_gone_since_planning() {
        let mut store = store(vec![
            entry(1, "v1"),
            entry(2, "v2").replacing(EntryId(8)),
            entry(3, "v2"),
        ]);
        let plan = ArchiveRepair::default().plan(&store, FEED).unwrap();
        assert_eq!(plan.report().content_replaced, 1);

        store.delete(EntryId(1)).unwrap();
        let report = ArchiveRepair::new(RepairConfig::apply())
            .apply(&mut store, &plan)
            .unwrap();

        assert_eq!(report, RepairReport { entries_corrected: 1, content_replaced: 0 });
        assert_eq!(replaces(&store, 2), Some(EntryId(1)));
    }

    #[test]
    fn test_second_run_is_clean() {
        let mut store = store(vec![
            entry(1, "v1"),
            entry(2, "v2").replacing(EntryId(8)),
            entry(3, "x"),
            entry(4, "y").replacing(EntryId(2)),
        ]);
        let repair = ArchiveRepair::new(RepairConfig::apply());

        assert!(!repair.repair_feed(&mut store, FEED).unwrap().is_clean());
        assert!(repair.repair_feed(&mut store, FEED).unwrap().is_clean());
    }

    #[test]
    fn test_repair_all_reports_per_feed() {
        let mut store = store(vec![
            entry(1, "a"),
            entry(2, "a").replacing(EntryId(7)),
            Entry::new(EntryId(3), FeedId(2), "b", 30),
        ]);

        let batch = ArchiveRepair::new(RepairConfig::apply())
            .repair_all(&mut store)
            .unwrap();

        assert_eq!(batch.feeds.len(), 2);
        assert_eq!(batch.total().entries_corrected, 1);
        assert_eq!(batch.touched().count(), 1);
    }

    #[test]
    fn test_plan_for_other_feed_is_rejected() {
        let mut store = store(vec![Entry::new(EntryId(1), FeedId(2), "x", 10)]);
        let mut plan = RepairPlan::new(FEED);
        plan.actions.push(RepairAction::ReplaceContent {
            entry: EntryId(1),
            source: EntryId(1),
            content: "y".into(),
        });

        let err = ArchiveRepair::default().apply(&mut store, &plan).unwrap_err();
        assert_eq!(err, RepairError::WrongFeed { plan: FEED, feed: FeedId(2) });
    }
}
