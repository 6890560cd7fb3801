//! Change notifications for in-process pollers.

use liveblog_core::{EntryId, FeedId, Timestamp};
use liveblog_repair::RepairReport;

/// Events emitted when a feed changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedEvent {
    /// A new entry was appended.
    Inserted { feed: FeedId, entry: EntryId, created_at: Timestamp },
    /// `original` was edited; `entry` is the appended notification.
    Updated {
        feed: FeedId,
        entry: EntryId,
        original: EntryId,
        created_at: Timestamp,
    },
    /// `original` was removed; `entry` is the tombstone.
    Deleted {
        feed: FeedId,
        entry: EntryId,
        original: EntryId,
        created_at: Timestamp,
    },
    /// Archive repair rewrote entries.
    Repaired { feed: FeedId, report: RepairReport },
}

impl FeedEvent {
    pub fn feed(&self) -> FeedId {
        match self {
            FeedEvent::Inserted { feed, .. }
            | FeedEvent::Updated { feed, .. }
            | FeedEvent::Deleted { feed, .. }
            | FeedEvent::Repaired { feed, .. } => *feed,
        }
    }
}
