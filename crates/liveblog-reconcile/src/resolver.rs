//! Replace-chain resolution.
//!
//! Updates rewrite their original in place, so whenever a batch holds both an
//! original and a record replacing it, the original already carries the latest
//! content and the replacing record is a duplicate. Resolution drops it.
//!
//! A record whose target is absent from the batch is kept. Either the original
//! was deleted (the record is the only evidence a delta reader has to retract
//! the slot) or the pointer is foreign; dropping it would make content vanish
//! with nothing visible in its place.
//!
//! Pointers are followed exactly one hop and only to test membership.

use hashlink::LinkedHashMap;
use liveblog_core::{Entry, EntryId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Resolved entries keyed by id, in input order.
pub type Resolved = LinkedHashMap<EntryId, Entry>;

/// Drop superseded records from `entries`, then truncate to `limit`.
///
/// Besides the duplicate rule, a non-delete record is dropped when the same
/// batch holds a later tombstone for the slot it replaces: the slot is gone
/// and the record describes an edit to nothing.
pub fn resolve<I>(entries: I, limit: Option<usize>) -> Resolved
where
    I: IntoIterator<Item = Entry>,
{
    let mut resolved: Resolved = entries.into_iter().map(|e| (e.id, e)).collect();
    let present: HashSet<EntryId> = resolved.keys().copied().collect();

    let mut latest_tombstone: HashMap<EntryId, EntryId> = HashMap::new();
    for entry in resolved.values().filter(|e| e.is_tombstone()) {
        if let Some(target) = entry.replaces {
            let slot = latest_tombstone.entry(target).or_insert(entry.id);
            *slot = (*slot).max(entry.id);
        }
    }

    let before = resolved.len();
    resolved.retain(|id, entry| {
        let Some(target) = entry.replaces else {
            return true;
        };
        if present.contains(&target) {
            return false;
        }
        if !entry.is_tombstone() {
            if let Some(tombstone) = latest_tombstone.get(&target) {
                return tombstone < id;
            }
        }
        true
    });
    let dropped = before - resolved.len();

    if let Some(limit) = limit {
        while resolved.len() > limit {
            resolved.pop_back();
        }
    }

    if dropped > 0 {
        debug!(dropped, kept = resolved.len(), "resolved replace chains");
    }
    resolved
}
