//! Error types for archive repair.

use liveblog_core::FeedId;
use liveblog_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepairError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Plan for feed {plan} applied to feed {feed}")]
    WrongFeed { plan: FeedId, feed: FeedId },
}

pub type Result<T> = std::result::Result<T, RepairError>;
