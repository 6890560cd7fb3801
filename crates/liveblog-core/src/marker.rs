//! Key-event ("headline") detection.
//!
//! Editors flag an entry as a key event by typing an inline command such as
//! `/key`. The content pipeline later rewrites that command into markup, so a
//! stored entry may carry either form and both must count.

use serde::{Deserialize, Serialize};

/// The two textual forms of the key-event marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventMarker {
    /// Command as typed by editors.
    pub inline: String,
    /// Command after content transformation.
    pub rendered: String,
}

impl Default for KeyEventMarker {
    fn default() -> Self {
        KeyEventMarker {
            inline: "/key".to_string(),
            rendered: r#"<span class="liveblog-command type-key">key</span>"#.to_string(),
        }
    }
}

impl KeyEventMarker {
    pub fn new(inline: impl Into<String>, rendered: impl Into<String>) -> Self {
        KeyEventMarker {
            inline: inline.into(),
            rendered: rendered.into(),
        }
    }

    /// True if `content` carries the marker in either form.
    pub fn is_key_event(&self, content: &str) -> bool {
        if !self.rendered.is_empty() && content.contains(&self.rendered) {
            return true;
        }
        !self.inline.is_empty() && contains_command(content, &self.inline)
    }
}

/// Match `command` only as a standalone token, so `/keynote` is not `/key`.
fn contains_command(content: &str, command: &str) -> bool {
    content.match_indices(command).any(|(start, _)| {
        let before = content[..start].chars().next_back();
        let after = content[start + command.len()..].chars().next();
        let opens = before.map_or(true, |c| c.is_whitespace() || c == '>' || c == '(');
        let closes = after.map_or(true, |c| !c.is_alphanumeric() && c != '_' && c != '-');
        opens && closes
    })
}
