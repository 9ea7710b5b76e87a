//! Transcript scroll position, anchored to the bottom.

/// Distance from the newest line, in rows.
///
/// Zero means following: new text stays in view as it streams in. When the
/// user has scrolled up, [`sync`](Self::sync) grows the offset with the
/// transcript so the visible lines stay put.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscriptScroll {
    from_bottom: usize,
    last_total: usize,
}

impl TranscriptScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_following(&self) -> bool {
        self.from_bottom == 0
    }

    #[cfg(test)]
    pub fn offset(&self) -> usize {
        self.from_bottom
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.from_bottom = self.from_bottom.saturating_add(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.from_bottom = self.from_bottom.saturating_sub(rows);
    }

    /// Jump back to the newest line and resume following.
    pub fn to_latest(&mut self) {
        self.from_bottom = 0;
    }

    /// Account for a new transcript length, then clamp to the top.
    pub fn sync(&mut self, total: usize, height: usize) {
        if !self.is_following() && total > self.last_total {
            self.from_bottom += total - self.last_total;
        }
        self.last_total = total;
        self.from_bottom = self.from_bottom.min(total.saturating_sub(height));
    }

    /// Index of the first visible line.
    pub fn top(&self, total: usize, height: usize) -> usize {
        total.saturating_sub(height).saturating_sub(self.from_bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_by_default() {
        let scroll = TranscriptScroll::new();
        assert!(scroll.is_following());
        assert_eq!(scroll.top(50, 10), 40);
        assert_eq!(scroll.top(5, 10), 0);
    }

    #[test]
    fn test_scroll_up_and_back() {
        let mut scroll = TranscriptScroll::new();
        scroll.scroll_up(3);
        assert!(!scroll.is_following());
        assert_eq!(scroll.top(50, 10), 37);

        scroll.scroll_down(1);
        assert_eq!(scroll.offset(), 2);
        scroll.scroll_down(10);
        assert!(scroll.is_following());
    }

    #[test]
    fn test_following_tracks_new_lines() {
        let mut scroll = TranscriptScroll::new();
        scroll.sync(50, 10);
        scroll.sync(52, 10);
        assert!(scroll.is_following());
        assert_eq!(scroll.top(52, 10), 42);
    }

    #[test]
    fn test_scrolled_view_holds_while_text_streams() {
        let mut scroll = TranscriptScroll::new();
        scroll.sync(50, 10);
        scroll.scroll_up(5);
        let before = scroll.top(50, 10);

        scroll.sync(53, 10);
        assert_eq!(scroll.top(53, 10), before);
    }

    #[test]
    fn test_sync_clamps_at_top() {
        let mut scroll = TranscriptScroll::new();
        scroll.sync(30, 10);
        scroll.scroll_up(100);
        scroll.sync(30, 10);
        assert_eq!(scroll.offset(), 20);
        assert_eq!(scroll.top(30, 10), 0);

        scroll.sync(5, 10);
        assert!(scroll.is_following());
    }

    #[test]
    fn test_to_latest() {
        let mut scroll = TranscriptScroll::new();
        scroll.scroll_up(7);
        scroll.to_latest();
        assert!(scroll.is_following());
    }
}
