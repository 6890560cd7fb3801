//! Record store trait and the in-memory implementation.
//!
//! The store is append-mostly: ids are assigned in creation order and never
//! reused. Reads carry no snapshot isolation; a caller that needs a stable
//! view copies the batch it queried.

use crate::error::{Result, StoreError};
use crate::query::QueryOptions;
use liveblog_core::{Author, Entry, EntryId, FeedId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An entry before the store assigns its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub feed_id: FeedId,
    pub content: String,
    pub author: Option<Author>,
    pub contributors: Vec<String>,
    pub created_at: Timestamp,
    pub replaces: Option<EntryId>,
    pub approved: bool,
}

impl NewEntry {
    pub fn new(feed_id: FeedId, content: impl Into<String>, created_at: Timestamp) -> Self {
        NewEntry {
            feed_id,
            content: content.into(),
            author: None,
            contributors: Vec::new(),
            created_at,
            replaces: None,
            approved: true,
        }
    }

    pub fn replacing(mut self, target: EntryId) -> Self {
        self.replaces = Some(target);
        self
    }

    pub fn author(mut self, author: Option<Author>) -> Self {
        self.author = author;
        self
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            feed_id: self.feed_id,
            content: self.content,
            author: self.author,
            contributors: self.contributors,
            created_at: self.created_at,
            replaces: self.replaces,
            approved: self.approved,
        }
    }
}

/// Field changes for a single-row update. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub content: Option<String>,
    pub replaces: Option<Option<EntryId>>,
    pub contributors: Option<Vec<String>>,
    pub approved: Option<bool>,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn replaces(mut self, target: Option<EntryId>) -> Self {
        self.replaces = Some(target);
        self
    }

    pub fn contributors(mut self, contributors: Vec<String>) -> Self {
        self.contributors = Some(contributors);
        self
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &EntryPatch::default()
    }

    fn apply(self, entry: &mut Entry) {
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(replaces) = self.replaces {
            entry.replaces = replaces;
        }
        if let Some(contributors) = self.contributors {
            entry.contributors = contributors;
        }
        if let Some(approved) = self.approved {
            entry.approved = approved;
        }
    }
}

/// Append-only storage of entry records.
///
/// Every method is atomic on its own. Nothing groups calls into a transaction.
pub trait RecordStore {
    /// Entries of one feed, filtered, ordered and limited by `options`.
    fn query(&self, feed: FeedId, options: &QueryOptions) -> Result<Vec<Entry>>;

    /// Look up a single entry.
    fn get(&self, id: EntryId) -> Result<Option<Entry>>;

    /// Append an entry, returning its newly assigned id.
    fn insert(&mut self, entry: NewEntry) -> Result<EntryId>;

    /// Rewrite fields of an existing entry.
    fn update(&mut self, id: EntryId, patch: EntryPatch) -> Result<()>;

    /// Physically remove an entry.
    fn delete(&mut self, id: EntryId) -> Result<()>;

    /// Every feed that has at least one entry.
    fn feeds(&self) -> Result<Vec<FeedId>>;

    /// Total number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered in-memory record store.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "StoreDump", into = "StoreDump")]
pub struct MemoryRecordStore {
    entries: BTreeMap<EntryId, Entry>,
    next_id: u64,
}

/// On-disk shape of a [`MemoryRecordStore`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StoreDump {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    entries: Vec<Entry>,
}

impl TryFrom<StoreDump> for MemoryRecordStore {
    type Error = StoreError;

    fn try_from(dump: StoreDump) -> Result<Self> {
        let mut store = MemoryRecordStore::with_entries(dump.entries)?;
        store.next_id = store.next_id.max(dump.next_id);
        Ok(store)
    }
}

impl From<MemoryRecordStore> for StoreDump {
    fn from(store: MemoryRecordStore) -> Self {
        StoreDump {
            next_id: store.next_id,
            entries: store.entries.into_values().collect(),
        }
    }
}

impl MemoryRecordStore {
    /// Create an empty store. The first assigned id is 1.
    pub fn new() -> Self {
        MemoryRecordStore {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Build a store from pre-identified entries.
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self> {
        let mut store = Self::new();
        for entry in entries {
            store.put(entry)?;
        }
        Ok(store)
    }

    /// Store an entry under its own id, bypassing id assignment.
    ///
    /// Used to load dumps and to stage drifted states. Later inserts still get
    /// ids above everything stored.
    pub fn put(&mut self, entry: Entry) -> Result<()> {
        let after = entry.id.0.checked_add(1).ok_or_else(|| {
            StoreError::InvalidInput(format!("entry id {} leaves no room for new ids", entry.id))
        })?;
        self.next_id = self.next_id.max(after);
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    /// Load a JSON dump.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a JSON dump.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Iterate all entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryRecordStore {
    fn query(&self, feed: FeedId, options: &QueryOptions) -> Result<Vec<Entry>> {
        let mut batch: Vec<Entry> = self
            .entries
            .values()
            .filter(|e| e.feed_id == feed && options.matches(e))
            .cloned()
            .collect();
        options.finish(&mut batch);
        Ok(batch)
    }

    fn get(&self, id: EntryId) -> Result<Option<Entry>> {
        Ok(self.entries.get(&id).cloned())
    }

    fn insert(&mut self, entry: NewEntry) -> Result<EntryId> {
        let id = EntryId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Storage("entry ids exhausted".into()))?;
        self.entries.insert(id, entry.into_entry(id));
        Ok(id)
    }

    fn update(&mut self, id: EntryId, patch: EntryPatch) -> Result<()> {
        let entry = self.entries.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(entry);
        Ok(())
    }

    fn delete(&mut self, id: EntryId) -> Result<()> {
        self.entries
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn feeds(&self) -> Result<Vec<FeedId>> {
        let feeds: BTreeSet<FeedId> = self.entries.values().map(|e| e.feed_id).collect();
        Ok(feeds.into_iter().collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
