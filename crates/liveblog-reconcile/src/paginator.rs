//! Fixed-size pages over a compacted feed.
//!
//! A reader resuming a partially consumed feed sends the display identity it
//! saw last; paging then starts at that slot, so offsets stay stable while new
//! slots keep arriving at the head. Unknown cursors and unknown jump targets
//! are not errors: they fall back to the requested (or first) page.

use crate::flatten::CompactedEntry;
use liveblog_core::EntryId;
use serde::{Deserialize, Serialize};

/// Paging parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-indexed page; 0 means unspecified.
    #[serde(default)]
    pub page: usize,
    pub per_page: usize,
    #[serde(default)]
    pub last_known_entry: Option<EntryId>,
    #[serde(default)]
    pub jump_to_id: Option<EntryId>,
}

impl PageRequest {
    pub fn new(per_page: usize) -> Self {
        PageRequest {
            page: 0,
            per_page,
            last_known_entry: None,
            jump_to_id: None,
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn last_known_entry(mut self, id: EntryId) -> Self {
        self.last_known_entry = Some(id);
        self
    }

    pub fn jump_to(mut self, id: EntryId) -> Self {
        self.jump_to_id = Some(id);
        self
    }
}

/// One page of a sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            pages: self.pages,
            total: self.total,
        }
    }
}

fn position(sequence: &[CompactedEntry], id: EntryId) -> Option<usize> {
    sequence
        .iter()
        .position(|c| c.key == id)
        .or_else(|| sequence.iter().position(|c| c.entry.id == id))
}

/// Slice `compacted` (newest slot first) into the requested page.
pub fn paginate(compacted: &[CompactedEntry], request: &PageRequest) -> Page<CompactedEntry> {
    let per_page = request.per_page.max(1);

    let sequence = match request.last_known_entry.and_then(|id| position(compacted, id)) {
        Some(offset) => &compacted[offset..],
        None => compacted,
    };

    let mut page = request.page;
    if page == 0 {
        if let Some(index) = request.jump_to_id.and_then(|id| position(sequence, id)) {
            page = (index + 1).div_ceil(per_page);
        }
    }
    let page = page.max(1);

    let total = sequence.len();
    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = page.saturating_mul(per_page).min(total);

    Page {
        items: sequence[start..end].to_vec(),
        page,
        pages: total.div_ceil(per_page),
        total,
    }
}
