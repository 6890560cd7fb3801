//! # liveblog-reconcile
//!
//! Pure transformations from a raw entry log to reader views.
//!
//! This crate provides:
//! - Resolution: drop superseded records, one visible record per slot ([`resolve`])
//! - Compaction: replay `new`/`update`/`delete` into the final state ([`flatten`])
//! - Pagination with resume cursors and jump-to-entry ([`paginate`])
//! - Lazyload windows between two rendered anchors ([`lazyload_window`])
//! - The key-event index ([`KeyEventIndex`])
//! - Response builders for pollers and renderers ([`response`])
//!
//! Nothing here performs I/O or holds shared state. Every function takes the
//! batch it works on and the feed it belongs to is implied by that batch, so
//! calls for different feeds can run concurrently without coordination.
//!
//! ## Which view to use
//!
//! | Reader                         | Pipeline                              |
//! |--------------------------------|---------------------------------------|
//! | first page load, poll deltas   | [`resolve`]                           |
//! | paginated archive              | [`resolve`] (cached) then [`flatten`] |
//! | headline sidebar               | [`resolve`] then [`KeyEventIndex`]    |
//!
//! ## Example
//!
//! ```rust
//! use liveblog_core::{Entry, EntryId, FeedId};
//! use liveblog_reconcile::{flatten, resolve};
//!
//! let feed = FeedId(1);
//! // Original edited in place, plus its notification record.
//! let a = Entry::new(EntryId(1), feed, "Match starts, 1-0", 100);
//! let b = Entry::new(EntryId(2), feed, "Match starts, 1-0", 160).replacing(EntryId(1));
//!
//! let resolved = resolve(vec![a.clone(), b.clone()], None);
//! assert_eq!(resolved.keys().copied().collect::<Vec<_>>(), vec![EntryId(1)]);
//!
//! // A delta window that starts after the original only sees the notification.
//! let delta = resolve(vec![b], None);
//! assert_eq!(delta.keys().copied().collect::<Vec<_>>(), vec![EntryId(2)]);
//!
//! let compacted = flatten(resolved.into_iter().map(|(_, e)| e));
//! assert_eq!(compacted.len(), 1);
//! ```

mod flatten;
mod key_events;
mod lazyload;
mod paginator;
mod resolver;
pub mod response;

pub use flatten::{flatten, CompactedEntry};
pub use key_events::KeyEventIndex;
pub use lazyload::{lazyload_window, LazyloadWindow};
pub use paginator::{paginate, Page, PageRequest};
pub use resolver::{resolve, Resolved};
pub use response::{
    KeyEventsResponse, LazyloadResponse, PagedResponse, PollResponse, SingleEntryResponse,
};
