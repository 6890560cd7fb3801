//! Error types for the liveblog SDK.

use crate::config::ConfigError;
use liveblog_core::EntryId;
use liveblog_repair::RepairError;
use liveblog_store::StoreError;
use std::fmt;

/// Error type for SDK operations.
#[derive(Debug)]
pub enum SdkError {
    /// Requested entry is not visible in the feed.
    EntryNotFound(EntryId),
    /// Record store failure.
    Store(StoreError),
    /// Archive repair failure.
    Repair(RepairError),
    /// Invalid configuration.
    Config(ConfigError),
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkError::EntryNotFound(id) => write!(f, "Entry not found: {}", id),
            SdkError::Store(e) => write!(f, "Store error: {}", e),
            SdkError::Repair(e) => write!(f, "Repair error: {}", e),
            SdkError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for SdkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SdkError::EntryNotFound(_) => None,
            SdkError::Store(e) => Some(e),
            SdkError::Repair(e) => Some(e),
            SdkError::Config(e) => Some(e),
        }
    }
}

impl From<StoreError> for SdkError {
    fn from(e: StoreError) -> Self {
        SdkError::Store(e)
    }
}

impl From<RepairError> for SdkError {
    fn from(e: RepairError) -> Self {
        SdkError::Repair(e)
    }
}

impl From<ConfigError> for SdkError {
    fn from(e: ConfigError) -> Self {
        SdkError::Config(e)
    }
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
