//! Lazyload windows.
//!
//! A long feed is rendered partially; a "load more" control between two
//! rendered entries asks for what lies strictly between their timestamps.

use liveblog_core::{Entry, Timestamp};

/// Entries between two anchors, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LazyloadWindow {
    pub entries: Vec<Entry>,
    /// Position of the first returned entry in the newest-first feed.
    pub index: usize,
}

/// Select resolved entries with `min_timestamp < created_at < max_timestamp`.
///
/// An absent anchor leaves that side open. At most `page_size` entries are
/// returned, the newest ones first.
pub fn lazyload_window(
    resolved: &[Entry],
    max_timestamp: Option<Timestamp>,
    min_timestamp: Option<Timestamp>,
    page_size: usize,
) -> LazyloadWindow {
    let mut ordered: Vec<&Entry> = resolved.iter().collect();
    ordered.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

    let inside = |e: &Entry| {
        max_timestamp.map_or(true, |max| e.created_at < max)
            && min_timestamp.map_or(true, |min| e.created_at > min)
    };

    let Some(index) = ordered.iter().position(|e| inside(*e)) else {
        return LazyloadWindow::default();
    };

    let entries = ordered[index..]
        .iter()
        .take_while(|e| inside(**e))
        .take(page_size)
        .map(|e| (*e).clone())
        .collect();

    LazyloadWindow { entries, index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveblog_core::{EntryId, FeedId};

    fn feed() -> Vec<Entry> {
        // Timestamps 10, 20, ..., 100
        (1..=10)
            .map(|i| Entry::new(EntryId(i), FeedId(1), "x", i as i64 * 10))
            .collect()
    }

    fn stamps(window: &LazyloadWindow) -> Vec<i64> {
        window.entries.iter().map(|e| e.created_at).collect()
    }

    #[test]
    fn test_strictly_between_anchors() {
        let window = lazyload_window(&feed(), Some(80), Some(40), 10);

        assert_eq!(stamps(&window), vec![70, 60, 50]);
        assert_eq!(window.index, 3);
    }

    #[test]
    fn test_open_bounds() {
        let below = lazyload_window(&feed(), Some(30), None, 10);
        assert_eq!(stamps(&below), vec![20, 10]);

        let above = lazyload_window(&feed(), None, Some(80), 10);
        assert_eq!(stamps(&above), vec![100, 90]);
        assert_eq!(above.index, 0);
    }

    #[test]
    fn test_capped_to_page_size() {
        let window = lazyload_window(&feed(), Some(95), None, 3);
        assert_eq!(stamps(&window), vec![90, 80, 70]);
        assert_eq!(window.index, 1);
    }

    #[test]
    fn test_empty_window() {
        let window = lazyload_window(&feed(), Some(41), Some(40), 5);
        assert!(window.entries.is_empty());
        assert_eq!(window.index, 0);
    }
}
