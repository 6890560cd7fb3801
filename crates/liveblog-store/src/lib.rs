//! # liveblog-store
//!
//! The storage side of a live feed.
//!
//! This crate provides:
//! - [`RecordStore`]: the contract the reconciliation code consumes
//! - [`MemoryRecordStore`]: an ordered in-memory implementation
//! - [`FeedWriter`]: the editor write protocol (every edit is two writes)
//! - [`FeedCache`]: per-feed cache of the resolved ascending view
//!
//! ## Write protocol
//!
//! Store calls are atomic one at a time, but the sequences below are not:
//!
//! 1. update: append `replaces = original` with the new content, then rewrite
//!    the original's content in place
//! 2. delete: append an empty tombstone, remove the original, then remove any
//!    entry that still points at the removed original
//!
//! A crash or a racing editor between steps leaves drift that
//! `liveblog-repair` restores offline.
//!
//! ## Example
//!
//! ```rust
//! use liveblog_core::FeedId;
//! use liveblog_store::{FeedWriter, MemoryRecordStore, QueryOptions, RecordStore};
//!
//! let mut store = MemoryRecordStore::new();
//! let writer = FeedWriter::new();
//! let feed = FeedId(1);
//!
//! let id = writer.insert(&mut store, feed, "Match starts", None, 100).unwrap();
//! writer.update(&mut store, feed, id, "Match starts, 1-0", None, 160).unwrap();
//!
//! let entries = store.query(feed, &QueryOptions::ascending()).unwrap();
//! assert_eq!(entries.len(), 2);
//! assert_eq!(store.get(id).unwrap().unwrap().content, "Match starts, 1-0");
//! ```

mod cache;
mod error;
mod query;
mod store;
mod writer;

pub use cache::{CacheStats, FeedCache};
pub use error::{Result, StoreError};
pub use query::{ApprovalFilter, Order, QueryOptions, TimeRange};
pub use store::{EntryPatch, MemoryRecordStore, NewEntry, RecordStore};
pub use writer::FeedWriter;
