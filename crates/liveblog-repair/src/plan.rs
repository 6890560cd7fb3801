//! Planned repair writes.

use crate::report::RepairReport;
use liveblog_core::{EntryId, FeedId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One planned write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RepairAction {
    /// Point `entry` at `to` instead of `from`.
    Relink {
        entry: EntryId,
        from: EntryId,
        to: EntryId,
    },
    /// Copy the content of `source` onto `entry`.
    ReplaceContent {
        entry: EntryId,
        source: EntryId,
        content: String,
    },
}

impl fmt::Display for RepairAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairAction::Relink { entry, from, to } => {
                write!(f, "relink entry {}: replaces {} -> {}", entry, from, to)
            }
            RepairAction::ReplaceContent { entry, source, .. } => {
                write!(f, "replace content of entry {} with entry {}", entry, source)
            }
        }
    }
}

/// Every write a repair run would make for one feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairPlan {
    pub feed: FeedId,
    pub actions: Vec<RepairAction>,
    /// Relinks were planned but content repair was abandoned because the
    /// duplicate count did not match them.
    pub content_skipped: bool,
}

impl RepairPlan {
    pub fn new(feed: FeedId) -> Self {
        RepairPlan {
            feed,
            actions: Vec::new(),
            content_skipped: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn report(&self) -> RepairReport {
        let mut report = RepairReport::default();
        for action in &self.actions {
            match action {
                RepairAction::Relink { .. } => report.entries_corrected += 1,
                RepairAction::ReplaceContent { .. } => report.content_replaced += 1,
            }
        }
        report
    }
}
