//! Editor-side write protocol.
//!
//! Every edit is expressed as more than one store call:
//!
//! - update: append a notification entry (`replaces = original`, new content),
//!   then rewrite the original's content in place. Full-state readers keep
//!   seeing the original id with fresh content; delta readers receive the
//!   notification.
//! - delete: append a tombstone (`replaces = original`, empty content), remove
//!   the original, then remove every other entry still pointing at it.
//!
//! The steps are not atomic as a group.

use crate::cache::FeedCache;
use crate::error::{Result, StoreError};
use crate::query::{ApprovalFilter, QueryOptions};
use crate::store::{EntryPatch, NewEntry, RecordStore};
use liveblog_core::{Author, Entry, EntryId, FeedId, Timestamp};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Applies editor actions to a record store.
#[derive(Clone, Debug, Default)]
pub struct FeedWriter {
    cache: Option<Arc<FeedCache>>,
}

impl FeedWriter {
    pub fn new() -> Self {
        FeedWriter { cache: None }
    }

    /// Invalidate `cache` for the touched feed after every write.
    pub fn with_cache(cache: Arc<FeedCache>) -> Self {
        FeedWriter { cache: Some(cache) }
    }

    /// Append a brand-new entry.
    pub fn insert<S: RecordStore>(
        &self,
        store: &mut S,
        feed: FeedId,
        content: &str,
        author: Option<Author>,
        created_at: Timestamp,
    ) -> Result<EntryId> {
        let id = store.insert(NewEntry::new(feed, content, created_at).author(author))?;
        self.invalidate(feed);
        info!(feed = %feed, entry = %id, "inserted entry");
        Ok(id)
    }

    /// Edit the slot identified by `target`.
    ///
    /// Returns the id of the appended notification entry.
    pub fn update<S: RecordStore>(
        &self,
        store: &mut S,
        feed: FeedId,
        target: EntryId,
        content: &str,
        author: Option<Author>,
        created_at: Timestamp,
    ) -> Result<EntryId> {
        if content.is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "update of entry {} has empty content; delete it instead",
                target
            )));
        }

        let mut original = self.slot_original(store, feed, target)?;
        if let Some(editor) = &author {
            original.add_contributor(&editor.id);
        }

        let notification = NewEntry::new(feed, content, created_at)
            .replacing(original.id)
            .author(author);
        let id = store.insert(notification)?;
        self.invalidate(feed);

        store.update(
            original.id,
            EntryPatch::new()
                .content(content)
                .contributors(original.contributors.clone()),
        )?;
        self.invalidate(feed);

        info!(feed = %feed, entry = %id, original = %original.id, "updated entry");
        Ok(id)
    }

    /// Delete the slot identified by `target`.
    ///
    /// Returns the id of the appended tombstone.
    pub fn delete<S: RecordStore>(
        &self,
        store: &mut S,
        feed: FeedId,
        target: EntryId,
        author: Option<Author>,
        created_at: Timestamp,
    ) -> Result<EntryId> {
        let original = self.slot_original(store, feed, target)?;

        let tombstone = NewEntry::new(feed, "", created_at)
            .replacing(original.id)
            .author(author);
        let id = store.insert(tombstone)?;
        self.invalidate(feed);

        store.delete(original.id)?;
        self.invalidate(feed);

        let orphans: Vec<EntryId> = store
            .query(
                feed,
                &QueryOptions::new()
                    .replaces_only()
                    .approval(ApprovalFilter::All),
            )?
            .into_iter()
            .filter(|e| e.replaces == Some(original.id) && e.id != id)
            .map(|e| e.id)
            .collect();
        for orphan in &orphans {
            match store.delete(*orphan) {
                Ok(()) => {}
                // Another writer got there first.
                Err(StoreError::NotFound(_)) => {
                    debug!(feed = %feed, entry = %orphan, "orphan already removed")
                }
                Err(e) => return Err(e),
            }
        }
        if !orphans.is_empty() {
            self.invalidate(feed);
        }

        info!(
            feed = %feed,
            entry = %id,
            original = %original.id,
            orphans = orphans.len(),
            "deleted entry"
        );
        Ok(id)
    }

    /// Resolve `target` to the original entry of its slot.
    ///
    /// Clients that learned about a slot through a delta hold the notification
    /// id, so a target that is itself an update is redirected one hop to the
    /// entry it replaces when that entry still exists.
    fn slot_original<S: RecordStore>(&self, store: &S, feed: FeedId, target: EntryId) -> Result<Entry> {
        let entry = store.get(target)?.ok_or(StoreError::NotFound(target))?;
        if entry.feed_id != feed {
            return Err(StoreError::FeedMismatch {
                id: target,
                expected: feed,
                found: entry.feed_id,
            });
        }
        if entry.is_tombstone() {
            return Err(StoreError::InvalidInput(format!(
                "entry {} is a deletion marker",
                target
            )));
        }

        match entry.replaces {
            Some(original_id) => match store.get(original_id)? {
                Some(original) if original.feed_id == feed => Ok(original),
                _ => {
                    warn!(feed = %feed, entry = %target, replaces = %original_id, "replaced entry is missing");
                    Ok(entry)
                }
            },
            None => Ok(entry),
        }
    }

    fn invalidate(&self, feed: FeedId) {
        if let Some(cache) = &self.cache {
            cache.invalidate(feed);
        }
    }
}
