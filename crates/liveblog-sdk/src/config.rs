//! Feed configuration.

use liveblog_core::{KeyEventMarker, ViewContext};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Per-deployment feed settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Entries per archive page.
    pub per_page: usize,
    /// Entries returned by one lazyload request.
    pub lazyload_page_size: usize,
    /// Cap on a poll response; 0 disables the cap.
    pub max_poll_entries: usize,
    /// Key events shown; 0 shows all.
    pub key_event_limit: usize,
    pub marker: KeyEventMarker,
    /// Feed page URL used for share links.
    pub permalink_base: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            per_page: 10,
            lazyload_page_size: 10,
            max_poll_entries: 100,
            key_event_limit: 0,
            marker: KeyEventMarker::default(),
            permalink_base: None,
        }
    }
}

impl FeedConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FeedConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(ConfigError::Invalid("per_page must be at least 1".into()));
        }
        if self.lazyload_page_size == 0 {
            return Err(ConfigError::Invalid(
                "lazyload_page_size must be at least 1".into(),
            ));
        }
        if self.marker.inline.is_empty() {
            return Err(ConfigError::Invalid("key event marker is empty".into()));
        }
        Ok(())
    }

    pub fn view_context(&self) -> ViewContext {
        ViewContext {
            marker: self.marker.clone(),
            permalink_base: self.permalink_base.clone(),
        }
    }
}

/// Builder for feed configuration.
pub struct FeedConfigBuilder {
    config: FeedConfig,
}

impl FeedConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: FeedConfig::default(),
        }
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.config.per_page = per_page;
        self
    }

    pub fn lazyload_page_size(mut self, size: usize) -> Self {
        self.config.lazyload_page_size = size;
        self
    }

    pub fn max_poll_entries(mut self, max: usize) -> Self {
        self.config.max_poll_entries = max;
        self
    }

    pub fn key_event_limit(mut self, limit: usize) -> Self {
        self.config.key_event_limit = limit;
        self
    }

    pub fn marker(mut self, marker: KeyEventMarker) -> Self {
        self.config.marker = marker;
        self
    }

    pub fn permalink_base(mut self, base: impl Into<String>) -> Self {
        self.config.permalink_base = Some(base.into());
        self
    }

    pub fn build(self) -> FeedConfig {
        self.config
    }
}

impl Default for FeedConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
