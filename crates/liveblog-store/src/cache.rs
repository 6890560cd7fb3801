//! Per-feed cache of the resolved, ascending entry view.
//!
//! Building that view scans a whole feed, so it is kept for the duration of a
//! read episode. Entries are dropped only by explicit invalidation on write;
//! there is no time-based expiry. A reader racing a writer may see the view
//! from just before the write, which callers already tolerate.

use liveblog_core::{Entry, FeedId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Hit and miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub cached_feeds: usize,
}

#[derive(Debug, Default)]
pub struct FeedCache {
    views: RwLock<HashMap<FeedId, Arc<Vec<Entry>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached view for `feed`, if present.
    pub fn get(&self, feed: FeedId) -> Option<Arc<Vec<Entry>>> {
        self.views.read().get(&feed).cloned()
    }

    /// Return the cached view or build, store and return it.
    ///
    /// The builder runs without the lock held; two concurrent misses may both
    /// build, and the later one wins.
    pub fn get_or_insert_with<F, E>(&self, feed: FeedId, build: F) -> Result<Arc<Vec<Entry>>, E>
    where
        F: FnOnce() -> Result<Vec<Entry>, E>,
    {
        if let Some(view) = self.get(feed) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(view);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let view = Arc::new(build()?);
        debug!(feed = %feed, entries = view.len(), "cached resolved feed view");
        self.views.write().insert(feed, view.clone());
        Ok(view)
    }

    /// Forget the view for `feed`. Called after every write to that feed.
    pub fn invalidate(&self, feed: FeedId) {
        if self.views.write().remove(&feed).is_some() {
            debug!(feed = %feed, "invalidated feed view");
        }
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.views.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            cached_feeds: self.views.read().len(),
        }
    }
}
