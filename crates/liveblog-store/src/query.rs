//! Query options understood by every record store.

use liveblog_core::{Entry, Timestamp};
use serde::{Deserialize, Serialize};

/// Result ordering on `created_at` (ties broken by id).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Descending,
    Ascending,
}

/// Which approval states a query returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalFilter {
    #[default]
    Approved,
    All,
}

/// Inclusive `created_at` bounds. An absent bound is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub after: Option<Timestamp>,
    pub before: Option<Timestamp>,
}

impl TimeRange {
    pub fn between(after: Timestamp, before: Timestamp) -> Self {
        TimeRange {
            after: Some(after),
            before: Some(before),
        }
    }

    pub fn since(after: Timestamp) -> Self {
        TimeRange {
            after: Some(after),
            before: None,
        }
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.after.map_or(true, |a| ts >= a) && self.before.map_or(true, |b| ts <= b)
    }
}

/// Options for [`RecordStore::query`](crate::RecordStore::query).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    #[serde(default)]
    pub order: Order,
    #[serde(default)]
    pub time_range: TimeRange,
    #[serde(default)]
    pub approval: ApprovalFilter,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Only entries that carry a `replaces` pointer.
    #[serde(default)]
    pub replaces_only: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Approved entries, oldest first.
    pub fn ascending() -> Self {
        Self::default().order(Order::Ascending)
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn time_range(mut self, range: TimeRange) -> Self {
        self.time_range = range;
        self
    }

    pub fn approval(mut self, approval: ApprovalFilter) -> Self {
        self.approval = approval;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn replaces_only(mut self) -> Self {
        self.replaces_only = true;
        self
    }

    /// Filter predicate shared by store implementations (ordering and limit excluded).
    pub fn matches(&self, entry: &Entry) -> bool {
        if self.approval == ApprovalFilter::Approved && !entry.approved {
            return false;
        }
        if self.replaces_only && entry.replaces.is_none() {
            return false;
        }
        self.time_range.contains(entry.created_at)
    }

    /// Sort and truncate a filtered batch in place.
    pub fn finish(&self, entries: &mut Vec<Entry>) {
        match self.order {
            Order::Ascending => entries.sort_by_key(|e| (e.created_at, e.id)),
            Order::Descending => {
                entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)))
            }
        }
        if let Some(limit) = self.limit {
            entries.truncate(limit);
        }
    }
}
