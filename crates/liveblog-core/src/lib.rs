//! # liveblog-core
//!
//! The append-only entry model shared by every liveblog crate.
//!
//! A feed is a log of [`Entry`] records. Nothing in the log is rewritten to
//! express an edit: an update or a deletion is a new record whose `replaces`
//! pointer names the record it supersedes. The kind of operation a record
//! stands for is derived, never stored:
//!
//! | `replaces` | `content`  | [`EntryType`] |
//! |------------|------------|---------------|
//! | absent     | anything   | `New`         |
//! | present    | non-empty  | `Update`      |
//! | present    | empty      | `Delete`      |
//!
//! ## Example
//!
//! ```rust
//! use liveblog_core::{Entry, EntryId, EntryType, FeedId};
//!
//! let original = Entry::new(EntryId(1), FeedId(7), "Kick-off", 100);
//! let edit = Entry::new(EntryId(2), FeedId(7), "Kick-off, 1-0", 160).replacing(EntryId(1));
//! let tombstone = Entry::new(EntryId(3), FeedId(7), "", 200).replacing(EntryId(1));
//!
//! assert_eq!(original.entry_type(), EntryType::New);
//! assert_eq!(edit.entry_type(), EntryType::Update);
//! assert_eq!(tombstone.entry_type(), EntryType::Delete);
//! ```

pub mod entry;
pub mod marker;
pub mod view;

pub use entry::{Author, Entry, EntryId, EntryType, FeedId, Timestamp};
pub use marker::KeyEventMarker;
pub use view::{ContentRenderer, EntryView, PlainRenderer, ViewContext};
