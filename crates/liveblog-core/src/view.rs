//! Presentation projection of entries.
//!
//! Rendering itself (command substitution, sanitisation, embeds) lives outside
//! this workspace and plugs in through [`ContentRenderer`].

use crate::entry::{Author, Entry, EntryId, EntryType, FeedId, Timestamp};
use crate::marker::KeyEventMarker;
use serde::{Deserialize, Serialize};

/// Turns raw entry markup into what readers see.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, entry: &Entry) -> String;
}

/// Renderer that passes content through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainRenderer;

impl ContentRenderer for PlainRenderer {
    fn render(&self, entry: &Entry) -> String {
        entry.content.clone()
    }
}

/// Settings shared by every view built for a feed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ViewContext {
    #[serde(default)]
    pub marker: KeyEventMarker,
    /// Base URL of the feed page; share links become `{base}#{id}`.
    #[serde(default)]
    pub permalink_base: Option<String>,
}

/// What a reader receives for one entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub id: EntryId,
    pub feed_id: FeedId,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub content: String,
    pub render: String,
    pub author: Option<Author>,
    pub contributors: Vec<String>,
    pub created_at: Timestamp,
    pub replaces: Option<EntryId>,
    pub key_event: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
}

impl EntryView {
    pub fn build(entry: &Entry, ctx: &ViewContext, renderer: &dyn ContentRenderer) -> Self {
        let render = renderer.render(entry);
        let key_event =
            ctx.marker.is_key_event(&entry.content) || ctx.marker.is_key_event(&render);

        EntryView {
            id: entry.id,
            feed_id: entry.feed_id,
            entry_type: entry.entry_type(),
            content: entry.content.clone(),
            render,
            author: entry.author.clone(),
            contributors: entry.contributors.clone(),
            created_at: entry.created_at,
            replaces: entry.replaces,
            key_event,
            share_link: ctx
                .permalink_base
                .as_ref()
                .map(|base| format!("{}#{}", base.trim_end_matches('#'), entry.id)),
        }
    }
}
