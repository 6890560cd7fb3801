//! liveblog SDK - Feed service for live-updating entry logs
//!
//! This SDK ties the record store, the per-feed cache, the reconciliation
//! views and archive repair into one [`FeedService`].
//!
//! # Quick Start
//!
//! ```rust
//! use liveblog_core::FeedId;
//! use liveblog_sdk::{FeedConfigBuilder, FeedService};
//! use liveblog_store::MemoryRecordStore;
//!
//! let config = FeedConfigBuilder::new().per_page(20).build();
//! let service = FeedService::new(MemoryRecordStore::new(), config);
//! let feed = FeedId(7);
//!
//! // Editors write
//! let kickoff = service.insert_entry(feed, "/key Kick-off", None, 1_700_000_000).unwrap();
//! service.update_entry(feed, kickoff, "/key Kick-off!", None, 1_700_000_060).unwrap();
//!
//! // Pollers ask for what changed since they last looked
//! let delta = service.entries_since(feed, 1_700_000_030).unwrap();
//! assert_eq!(delta.entries.len(), 1);
//!
//! // The archive shows each slot once
//! let page = service.entries_paged(feed, 1, None, None).unwrap();
//! assert_eq!(page.total, 1);
//! ```
//!
//! # Architecture
//!
//! - [`service`] - Editor writes, reader views, repair
//! - [`config`] - Feed settings and their JSON form
//! - [`events`] - Change notifications
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod events;
pub mod service;

// Re-exports for convenience
pub use config::{ConfigError, FeedConfig, FeedConfigBuilder};
pub use error::{Result, SdkError};
pub use events::FeedEvent;
pub use service::FeedService;

pub use liveblog_core::{Author, Entry, EntryId, EntryType, EntryView, FeedId, Timestamp};
pub use liveblog_reconcile::{
    KeyEventsResponse, LazyloadResponse, PagedResponse, PollResponse, SingleEntryResponse,
};
pub use liveblog_repair::{BatchReport, RepairReport};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{FeedConfig, FeedConfigBuilder};
    pub use crate::error::SdkError;
    pub use crate::events::FeedEvent;
    pub use crate::service::FeedService;
    pub use liveblog_core::{Author, EntryId, FeedId};
    pub use liveblog_store::{MemoryRecordStore, RecordStore};
}
