//! The feed service: one entry point for editors, readers and operators.

use crate::config::FeedConfig;
use crate::error::{Result, SdkError};
use crate::events::FeedEvent;
use liveblog_core::{
    Author, ContentRenderer, Entry, EntryId, FeedId, PlainRenderer, Timestamp, ViewContext,
};
use liveblog_reconcile::{
    flatten, lazyload_window, paginate, resolve, KeyEventIndex, KeyEventsResponse,
    LazyloadResponse, PageRequest, PagedResponse, PollResponse, SingleEntryResponse,
};
use liveblog_repair::{ArchiveRepair, BatchReport, RepairConfig, RepairReport};
use liveblog_store::{
    CacheStats, FeedCache, FeedWriter, QueryOptions, RecordStore, StoreError, TimeRange,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Serves every reader view of a set of feeds and applies editor writes.
///
/// The store sits behind a `RwLock`; each editor action holds the write lock
/// for its whole multi-step write, and readers share the read lock. Other
/// processes writing to the same backing store get no such guarantee, which
/// is what [`repair`](Self::repair) is for.
///
/// # Example
///
/// ```rust
/// use liveblog_core::FeedId;
/// use liveblog_sdk::{FeedConfig, FeedService};
/// use liveblog_store::MemoryRecordStore;
///
/// let service = FeedService::new(MemoryRecordStore::new(), FeedConfig::default());
/// let feed = FeedId(1);
///
/// let id = service.insert_entry(feed, "Match starts", None, 100).unwrap();
/// service.update_entry(feed, id, "Match starts, 1-0", None, 160).unwrap();
///
/// let page = service.entries_paged(feed, 1, None, None).unwrap();
/// assert_eq!(page.entries[0].content, "Match starts, 1-0");
/// ```
pub struct FeedService<S: RecordStore> {
    store: Arc<RwLock<S>>,
    cache: Arc<FeedCache>,
    writer: FeedWriter,
    config: FeedConfig,
    context: ViewContext,
    renderer: Arc<dyn ContentRenderer>,
    event_tx: broadcast::Sender<FeedEvent>,
}

impl<S: RecordStore> FeedService<S> {
    pub fn new(store: S, config: FeedConfig) -> Self {
        Self::with_shared_store(Arc::new(RwLock::new(store)), config)
    }

    /// Serve a store that other components also hold.
    pub fn with_shared_store(store: Arc<RwLock<S>>, config: FeedConfig) -> Self {
        let cache = Arc::new(FeedCache::new());
        let (event_tx, _) = broadcast::channel(256);

        Self {
            store,
            writer: FeedWriter::with_cache(cache.clone()),
            cache,
            context: config.view_context(),
            config,
            renderer: Arc::new(PlainRenderer),
            event_tx,
        }
    }

    pub fn with_renderer(mut self, renderer: impl ContentRenderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<RwLock<S>> {
        &self.store
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Subscribe to change events for every feed.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: FeedEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }

    // Editor writes

    pub fn insert_entry(
        &self,
        feed: FeedId,
        content: &str,
        author: Option<Author>,
        created_at: Timestamp,
    ) -> Result<EntryId> {
        let entry = {
            let mut store = self.store.write();
            self.writer.insert(&mut *store, feed, content, author, created_at)?
        };
        self.emit(FeedEvent::Inserted { feed, entry, created_at });
        Ok(entry)
    }

    /// Edit the slot `target` belongs to. Returns the notification's id.
    pub fn update_entry(
        &self,
        feed: FeedId,
        target: EntryId,
        content: &str,
        author: Option<Author>,
        created_at: Timestamp,
    ) -> Result<EntryId> {
        let (entry, original) = {
            let mut store = self.store.write();
            let entry = self
                .writer
                .update(&mut *store, feed, target, content, author, created_at)?;
            let original = store.get(entry)?.and_then(|e| e.replaces).unwrap_or(target);
            (entry, original)
        };
        self.emit(FeedEvent::Updated { feed, entry, original, created_at });
        Ok(entry)
    }

    /// Delete the slot `target` belongs to. Returns the tombstone's id.
    pub fn delete_entry(
        &self,
        feed: FeedId,
        target: EntryId,
        author: Option<Author>,
        created_at: Timestamp,
    ) -> Result<EntryId> {
        let (entry, original) = {
            let mut store = self.store.write();
            let entry = self
                .writer
                .delete(&mut *store, feed, target, author, created_at)?;
            let original = store.get(entry)?.and_then(|e| e.replaces).unwrap_or(target);
            (entry, original)
        };
        self.emit(FeedEvent::Deleted { feed, entry, original, created_at });
        Ok(entry)
    }

    // Reader views

    /// The resolved feed, oldest first. Cached until the next write.
    pub fn all_entries_asc(&self, feed: FeedId) -> Result<Arc<Vec<Entry>>> {
        // Hold the read lock across the build so no write can slip in between
        // the query and the cache insert.
        let store = self.store.read();
        let view = self.cache.get_or_insert_with(feed, || {
            let entries = store.query(feed, &QueryOptions::ascending())?;
            Ok::<_, StoreError>(resolve(entries, None).into_iter().map(|(_, e)| e).collect())
        })?;
        Ok(view)
    }

    /// Delta for a poller: resolved entries with `since <= created_at <= until`.
    pub fn entries_between(
        &self,
        feed: FeedId,
        since: Timestamp,
        until: Timestamp,
    ) -> Result<PollResponse> {
        self.poll(feed, TimeRange::between(since, until))
    }

    /// Delta for a poller with no upper bound.
    pub fn entries_since(&self, feed: FeedId, since: Timestamp) -> Result<PollResponse> {
        self.poll(feed, TimeRange::since(since))
    }

    fn poll(&self, feed: FeedId, range: TimeRange) -> Result<PollResponse> {
        let window = self
            .store
            .read()
            .query(feed, &QueryOptions::ascending().time_range(range))?;
        let resolved = resolve(window, None);
        debug!(feed = %feed, entries = resolved.len(), "poll window resolved");

        Ok(PollResponse::build(
            resolved.values(),
            self.config.max_poll_entries,
            &self.context,
            self.renderer.as_ref(),
        ))
    }

    /// One entry with the timestamps of its neighbours.
    pub fn single_entry(&self, feed: FeedId, id: EntryId) -> Result<SingleEntryResponse> {
        let view = self.all_entries_asc(feed)?;
        SingleEntryResponse::build(&view, id, &self.context, self.renderer.as_ref())
            .ok_or(SdkError::EntryNotFound(id))
    }

    /// Entries strictly between two rendered anchors.
    pub fn lazyload(
        &self,
        feed: FeedId,
        max_timestamp: Option<Timestamp>,
        min_timestamp: Option<Timestamp>,
    ) -> Result<LazyloadResponse> {
        let view = self.all_entries_asc(feed)?;
        let window = lazyload_window(
            &view,
            max_timestamp,
            min_timestamp,
            self.config.lazyload_page_size,
        );
        Ok(LazyloadResponse::build(&window, &self.context, self.renderer.as_ref()))
    }

    /// One page of the compacted archive, newest slot first.
    pub fn entries_paged(
        &self,
        feed: FeedId,
        page: usize,
        last_known_entry: Option<EntryId>,
        jump_to_id: Option<EntryId>,
    ) -> Result<PagedResponse> {
        let view = self.all_entries_asc(feed)?;
        let compacted = flatten(view.iter().cloned());
        let request = PageRequest {
            page,
            per_page: self.config.per_page,
            last_known_entry,
            jump_to_id,
        };

        let page = paginate(&compacted, &request);
        Ok(PagedResponse::build(&page, &self.context, self.renderer.as_ref()))
    }

    pub fn key_events(&self, feed: FeedId) -> Result<KeyEventsResponse> {
        let view = self.all_entries_asc(feed)?;
        let index = KeyEventIndex::new(self.config.marker.clone(), self.config.key_event_limit);
        let events = index.collect(view.iter());
        Ok(KeyEventsResponse::build(&events, &self.context, self.renderer.as_ref()))
    }

    /// `created_at` of the newest approved entry, tombstones included.
    pub fn latest_timestamp(&self, feed: FeedId) -> Result<Option<Timestamp>> {
        let newest = self.store.read().query(feed, &QueryOptions::new().limit(1))?;
        Ok(newest.first().map(|e| e.created_at))
    }

    // Maintenance

    pub fn repair(&self, feed: FeedId, dry_run: bool) -> Result<RepairReport> {
        let report = {
            let mut store = self.store.write();
            ArchiveRepair::new(RepairConfig { dry_run }).repair_feed(&mut *store, feed)?
        };

        if !dry_run && !report.is_clean() {
            self.cache.invalidate(feed);
            self.emit(FeedEvent::Repaired { feed, report });
        }
        Ok(report)
    }

    pub fn repair_all(&self, dry_run: bool) -> Result<BatchReport> {
        let batch = {
            let mut store = self.store.write();
            ArchiveRepair::new(RepairConfig { dry_run }).repair_all(&mut *store)?
        };

        if !dry_run {
            for (feed, report) in batch.touched() {
                self.cache.invalidate(*feed);
                self.emit(FeedEvent::Repaired { feed: *feed, report: *report });
            }
        }
        Ok(batch)
    }
}
