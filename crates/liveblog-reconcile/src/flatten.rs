//! Log compaction ("flatten").
//!
//! Replays a chronological batch into one record per live slot, the way an
//! event-sourced log is compacted: `new`/`update` upsert their slot, `delete`
//! removes it. The result is the final state for a stable, paginated archive.
//!
//! Slots are keyed by display identity. A record normally lands under its own
//! id (a tombstone acts on the id it replaces). When a record's `replaces`
//! names something already replayed, it acts on whichever slot that record
//! landed in. This is a single lookup into what the replay has seen so far,
//! never a walk along pointers.

use hashlink::LinkedHashMap;
use liveblog_core::{Entry, EntryId, EntryType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One live slot of the compacted feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactedEntry {
    /// Display identity readers know the slot by.
    pub key: EntryId,
    /// Latest record for the slot.
    pub entry: Entry,
}

/// Replay `entries` (oldest first) and return live slots, newest slot first.
pub fn flatten<I>(entries: I) -> Vec<CompactedEntry>
where
    I: IntoIterator<Item = Entry>,
{
    let mut slots: LinkedHashMap<EntryId, Entry> = LinkedHashMap::new();
    let mut landed: HashMap<EntryId, EntryId> = HashMap::new();

    for entry in entries {
        match (entry.entry_type(), entry.replaces) {
            (EntryType::Delete, Some(target)) => {
                let key = landed.get(&target).copied().unwrap_or(target);
                slots.remove(&key);
            }
            (EntryType::Update, Some(target)) => {
                let key = landed
                    .get(&target)
                    .copied()
                    .filter(|key| slots.contains_key(key))
                    .unwrap_or(entry.id);
                landed.insert(entry.id, key);
                // Rewrites keep the slot's place in the replay order.
                slots.replace(key, entry);
            }
            _ => {
                landed.insert(entry.id, entry.id);
                slots.insert(entry.id, entry);
            }
        }
    }

    slots
        .into_iter()
        .rev()
        .map(|(key, entry)| CompactedEntry { key, entry })
        .collect()
}
