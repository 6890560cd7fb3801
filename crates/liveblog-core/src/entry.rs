//! Append-only entry records.
//!
//! An [`Entry`] is one record in a feed's log. Its identity never changes once
//! the store assigns it; later records refer to it through their `replaces`
//! pointer. A pointer is always a single hop: multi-step edit history is
//! recovered by ordering records on `created_at`, never by walking pointers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix timestamp in seconds. Authoritative for ordering.
pub type Timestamp = i64;

/// Store-assigned entry identifier, strictly increasing in creation order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        EntryId(id)
    }
}

/// Identifier of a live feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedId(pub u64);

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FeedId {
    fn from(id: u64) -> Self {
        FeedId(id)
    }
}

/// The editor who wrote an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>) -> Self {
        Author {
            id: id.into(),
            name: None,
            email: None,
            url: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// The operation a record stands for, derived from `replaces` and `content`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Brand-new content (no `replaces`).
    New,
    /// Replacement content for an existing slot.
    Update,
    /// Tombstone: the slot was removed.
    Delete,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::New => "new",
            EntryType::Update => "update",
            EntryType::Delete => "delete",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single append-only record in a feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub feed_id: FeedId,
    /// Raw markup. Empty content on a replacing record marks a tombstone.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<Author>,
    /// Author ids of everyone who edited the slot after its author.
    #[serde(default)]
    pub contributors: Vec<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub replaces: Option<EntryId>,
    /// Readers only ever see approved entries.
    #[serde(default = "default_approved")]
    pub approved: bool,
}

fn default_approved() -> bool {
    true
}

impl Entry {
    /// Create an approved, anonymous, brand-new entry.
    pub fn new(id: EntryId, feed_id: FeedId, content: impl Into<String>, created_at: Timestamp) -> Self {
        Entry {
            id,
            feed_id,
            content: content.into(),
            author: None,
            contributors: Vec::new(),
            created_at,
            replaces: None,
            approved: true,
        }
    }

    /// Set the slot this entry supersedes.
    pub fn replacing(mut self, target: EntryId) -> Self {
        self.replaces = Some(target);
        self
    }

    /// Set the author.
    pub fn by(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    /// Mark the entry as awaiting approval.
    pub fn unapproved(mut self) -> Self {
        self.approved = false;
        self
    }

    /// Derive the operation this record stands for.
    pub fn entry_type(&self) -> EntryType {
        match self.replaces {
            None => EntryType::New,
            Some(_) if self.content.is_empty() => EntryType::Delete,
            Some(_) => EntryType::Update,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.entry_type() == EntryType::Delete
    }

    /// The reader-visible slot this record acts on when replayed on its own:
    /// its own id for `new`/`update`, the replaced id for `delete`.
    pub fn display_id(&self) -> EntryId {
        match (self.entry_type(), self.replaces) {
            (EntryType::Delete, Some(target)) => target,
            _ => self.id,
        }
    }

    /// Record `author_id` as a contributor unless it is already the author or listed.
    pub fn add_contributor(&mut self, author_id: &str) {
        let is_author = self.author.as_ref().is_some_and(|a| a.id == author_id);
        if !is_author && !self.contributors.iter().any(|c| c == author_id) {
            self.contributors.push(author_id.to_string());
        }
    }
}
