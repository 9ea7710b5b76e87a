//! Transcript pane widget.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::{IconSet, Theme};

/// Hint shown before any message exists.
const EMPTY_HINT: &str = "Start a conversation by typing below.";

/// Columns of padding on each side of the transcript.
pub const TRANSCRIPT_PADDING: u16 = 1;

/// Draws a window of pre-rendered transcript lines.
///
/// ```text
///  ◆ Assistant
///  Hello! How can I help you today?
///
///  ▍ You
///  What is Rust?
///                                  ↓ newer below
/// ```
pub struct TranscriptView<'a> {
    lines: &'a [Line<'static>],
    top: usize,
    following: bool,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> TranscriptView<'a> {
    pub fn new(lines: &'a [Line<'static>], theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            lines,
            top: 0,
            following: true,
            theme,
            icons,
        }
    }

    /// First visible line.
    #[must_use]
    pub fn top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Whether the view is pinned to the newest line.
    #[must_use]
    pub fn following(mut self, following: bool) -> Self {
        self.following = following;
        self
    }

    /// Width available for text inside `area`.
    pub fn text_width(area: Rect) -> u16 {
        area.width.saturating_sub(TRANSCRIPT_PADDING * 2)
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.theme.base));

        let inner = Rect {
            x: area.x + TRANSCRIPT_PADDING.min(area.width),
            width: Self::text_width(area),
            ..area
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.lines.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                EMPTY_HINT,
                Style::default().fg(self.theme.muted),
            )))
            .alignment(Alignment::Center)
            .render(Rect { height: 1, ..inner }, buf);
            return;
        }

        let visible: Vec<Line<'static>> = self
            .lines
            .iter()
            .skip(self.top)
            .take(usize::from(inner.height))
            .cloned()
            .collect();
        Paragraph::new(visible).render(inner, buf);

        if !self.following {
            let marker = Line::from(Span::styled(
                format!("{} newer below ", self.icons.down_arrow()),
                Style::default().fg(self.theme.info).bg(self.theme.surface),
            ))
            .alignment(Alignment::Right);
            let row = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            marker.render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::render_widget_to_string;
    use crate::theme::IconMode;

    fn lines(n: usize) -> Vec<Line<'static>> {
        (0..n).map(|i| Line::from(format!("line {i}"))).collect()
    }

    #[test]
    fn test_empty_hint() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let out = render_widget_to_string(TranscriptView::new(&[], &theme, &icons), 40, 3);
        assert!(out.lines().next().unwrap().contains("Start a conversation"));
    }

    #[test]
    fn test_renders_window_with_padding() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let content = lines(10);
        let out = render_widget_to_string(
            TranscriptView::new(&content, &theme, &icons).top(7),
            20,
            3,
        );
        assert_eq!(out, " line 7\n line 8\n line 9");
    }

    #[test]
    fn test_marker_when_scrolled_up() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let content = lines(10);
        let out = render_widget_to_string(
            TranscriptView::new(&content, &theme, &icons)
                .top(2)
                .following(false),
            24,
            3,
        );
        assert_eq!(out, " line 2\n line 3\n line 4  v newer below");
    }
}
