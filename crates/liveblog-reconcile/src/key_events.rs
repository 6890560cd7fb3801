//! Key-event index: the headline subset of a resolved feed.

use liveblog_core::{Entry, KeyEventMarker};
use serde::{Deserialize, Serialize};

/// Filters resolved entries down to key events with their own display limit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventIndex {
    #[serde(default)]
    pub marker: KeyEventMarker,
    /// Maximum entries shown; 0 means no limit.
    #[serde(default)]
    pub limit: usize,
}

impl KeyEventIndex {
    pub fn new(marker: KeyEventMarker, limit: usize) -> Self {
        KeyEventIndex { marker, limit }
    }

    pub fn is_key_event(&self, entry: &Entry) -> bool {
        self.marker.is_key_event(&entry.content)
    }

    /// Key events among `resolved`, newest first, limited last.
    pub fn collect<'a, I>(&self, resolved: I) -> Vec<Entry>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut events: Vec<Entry> = resolved
            .into_iter()
            .filter(|e| self.is_key_event(e))
            .cloned()
            .collect();
        events.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        if self.limit > 0 {
            events.truncate(self.limit);
        }
        events
    }
}
