//! # liveblog-repair
//!
//! Offline, re-runnable consistency restoration for feed archives.
//!
//! Editor writes are several store calls with no transaction around them, so
//! racing edits can leave a feed with:
//! - `replaces` pointers that name the wrong original
//! - originals whose in-place content rewrite was lost
//!
//! [`ArchiveRepair`] plans fixes for both, reports them, and applies them
//! unless running dry. Planning is pure; applying a plan executes the
//! planned writes and nothing else. A repaired feed plans nothing on the
//! next run.
//!
//! ## Example
//!
//! ```rust
//! use liveblog_core::{Entry, EntryId, FeedId};
//! use liveblog_repair::{ArchiveRepair, RepairConfig};
//! use liveblog_store::MemoryRecordStore;
//!
//! let feed = FeedId(1);
//! let mut store = MemoryRecordStore::with_entries(vec![
//!     Entry::new(EntryId(1), feed, "Kick-off", 10),
//!     Entry::new(EntryId(2), feed, "Kick-off", 20).replacing(EntryId(7)),
//! ])
//! .unwrap();
//!
//! let report = ArchiveRepair::new(RepairConfig::dry_run())
//!     .repair_feed(&mut store, feed)
//!     .unwrap();
//! assert_eq!(report.entries_corrected, 1);
//! ```

mod error;
mod plan;
mod report;
mod repair;

pub use error::{RepairError, Result};
pub use plan::{RepairAction, RepairPlan};
pub use report::{BatchReport, RepairReport};
pub use repair::{ArchiveRepair, RepairConfig};
