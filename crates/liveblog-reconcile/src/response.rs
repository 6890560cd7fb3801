//! Response shapes handed to pollers and renderers.
//!
//! These are transport-agnostic: callers serialize them however their
//! endpoint or CLI needs.

use crate::flatten::CompactedEntry;
use crate::lazyload::LazyloadWindow;
use crate::paginator::Page;
use liveblog_core::{ContentRenderer, Entry, EntryId, EntryView, Timestamp, ViewContext};
use serde::{Deserialize, Serialize};

/// Delta for a poller.
///
/// `latest_timestamp` is `None` when the window held more entries than were
/// returned: the client must not assume it is caught up and should continue
/// from the newest entry it received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResponse {
    pub entries: Vec<EntryView>,
    pub latest_timestamp: Option<Timestamp>,
}

impl PollResponse {
    /// Build from resolved window entries, oldest first, capped at `max_entries`.
    pub fn build<'a, I>(
        window: I,
        max_entries: usize,
        ctx: &ViewContext,
        renderer: &dyn ContentRenderer,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut ordered: Vec<&Entry> = window.into_iter().collect();
        ordered.sort_by_key(|e| (e.created_at, e.id));

        let truncated = max_entries > 0 && ordered.len() > max_entries;
        if truncated {
            ordered.truncate(max_entries);
        }

        let latest_timestamp = if truncated {
            None
        } else {
            ordered.iter().map(|e| e.created_at).max()
        };

        PollResponse {
            entries: ordered
                .into_iter()
                .map(|e| EntryView::build(e, ctx, renderer))
                .collect(),
            latest_timestamp,
        }
    }
}

/// One entry plus the timestamps of its chronological neighbours.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleEntryResponse {
    pub entries: Vec<EntryView>,
    /// Position in the newest-first feed.
    pub index: usize,
    /// `created_at` of the next newer resolved entry.
    pub next_timestamp: Option<Timestamp>,
    /// `created_at` of the next older resolved entry.
    pub previous_timestamp: Option<Timestamp>,
}

impl SingleEntryResponse {
    /// Locate `id` in the resolved feed (oldest first). `None` if absent.
    pub fn build(
        resolved_asc: &[Entry],
        id: EntryId,
        ctx: &ViewContext,
        renderer: &dyn ContentRenderer,
    ) -> Option<Self> {
        let position = resolved_asc.iter().position(|e| e.id == id)?;
        let entry = &resolved_asc[position];

        Some(SingleEntryResponse {
            entries: vec![EntryView::build(entry, ctx, renderer)],
            index: resolved_asc.len() - 1 - position,
            next_timestamp: resolved_asc.get(position + 1).map(|e| e.created_at),
            previous_timestamp: position
                .checked_sub(1)
                .and_then(|p| resolved_asc.get(p))
                .map(|e| e.created_at),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyloadResponse {
    pub entries: Vec<EntryView>,
    pub index: usize,
}

impl LazyloadResponse {
    pub fn build(window: &LazyloadWindow, ctx: &ViewContext, renderer: &dyn ContentRenderer) -> Self {
        LazyloadResponse {
            entries: window
                .entries
                .iter()
                .map(|e| EntryView::build(e, ctx, renderer))
                .collect(),
            index: window.index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResponse {
    pub entries: Vec<EntryView>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl PagedResponse {
    pub fn build(page: &Page<CompactedEntry>, ctx: &ViewContext, renderer: &dyn ContentRenderer) -> Self {
        PagedResponse {
            entries: page
                .items
                .iter()
                .map(|c| EntryView::build(&c.entry, ctx, renderer))
                .collect(),
            page: page.page,
            pages: page.pages,
            total: page.total,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventsResponse {
    pub entries: Vec<EntryView>,
}

impl KeyEventsResponse {
    pub fn build(events: &[Entry], ctx: &ViewContext, renderer: &dyn ContentRenderer) -> Self {
        KeyEventsResponse {
            entries: events
                .iter()
                .map(|e| EntryView::build(e, ctx, renderer))
                .collect(),
        }
    }
}
