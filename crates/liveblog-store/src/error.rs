//! Error types for record store operations.

use liveblog_core::{EntryId, FeedId};
use thiserror::Error;

/// Errors surfaced by a [`RecordStore`](crate::RecordStore) or the write protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    #[error("Entry {id} belongs to feed {found}, not feed {expected}")]
    FeedMismatch {
        id: EntryId,
        expected: FeedId,
        found: FeedId,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
