//! Header bar: sidebar toggle, title and session phase.
//!
//! Format: `[≡] AI Professional Assistant                    ● Streaming`

use chatline_engine::Phase;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::text::visual_width;
use crate::theme::{IconSet, Theme};

/// Application title.
pub const TITLE: &str = "AI Professional Assistant";

/// Header bar widget.
pub struct Header<'a> {
    theme: &'a Theme,
    icons: &'a IconSet,
    phase: Phase,
    sidebar_open: bool,
}

impl<'a> Header<'a> {
    pub fn new(theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            theme,
            icons,
            phase: Phase::Idle,
            sidebar_open: false,
        }
    }

    #[must_use]
    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Highlight the toggle while the sidebar is open.
    #[must_use]
    pub fn sidebar_open(mut self, open: bool) -> Self {
        self.sidebar_open = open;
        self
    }

    /// Whether a click at `column` lands on the sidebar toggle.
    pub fn hits_toggle(area: Rect, column: u16, row: u16) -> bool {
        row == area.y && column >= area.x && column < area.x + 3
    }

    fn phase_color(&self) -> ratatui::style::Color {
        match self.phase {
            Phase::Idle => self.theme.success,
            Phase::Sending => self.theme.warning,
            Phase::Streaming => self.theme.info,
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let toggle_color = if self.sidebar_open {
            self.theme.primary
        } else {
            self.theme.subtext
        };
        let mut spans = vec![
            Span::styled(self.icons.menu(), Style::default().fg(toggle_color)),
            Span::raw(" "),
            Span::styled(
                TITLE,
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
        ];

        let right = vec![
            Span::styled(
                format!("{} ", self.icons.dot(true)),
                Style::default().fg(self.phase_color()),
            ),
            Span::styled(
                format!("{} ", self.phase.display_name()),
                Style::default().fg(self.theme.subtext),
            ),
        ];

        let left_width: usize = spans.iter().map(|s| visual_width(&s.content)).sum();
        let right_width: usize = right.iter().map(|s| visual_width(&s.content)).sum();
        let total = usize::from(area.width);
        if left_width + right_width < total {
            spans.push(Span::raw(" ".repeat(total - left_width - right_width)));
            spans.extend(right);
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::render_widget_to_string;
    use crate::theme::IconMode;

    #[test]
    fn test_header_layout() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let out = render_widget_to_string(
            Header::new(&theme, &icons).phase(Phase::Streaming),
            50,
            1,
        );
        insta::assert_snapshot!(out, @"[=] AI Professional Assistant         o Streaming");
    }

    #[test]
    fn test_narrow_header_drops_phase() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let out = render_widget_to_string(Header::new(&theme, &icons), 30, 1);
        assert_eq!(out, "[=] AI Professional Assistant");
    }

    #[test]
    fn test_toggle_hit_area() {
        let area = Rect::new(0, 0, 80, 1);
        assert!(Header::hits_toggle(area, 0, 0));
        assert!(Header::hits_toggle(area, 2, 0));
        assert!(!Header::hits_toggle(area, 3, 0));
        assert!(!Header::hits_toggle(area, 1, 1));
    }
}
