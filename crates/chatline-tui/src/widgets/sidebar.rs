//! Sidebar panel and the overlay drawn behind it when it floats.
//!
//! ```text
//! ╭─ Chat ───────────────────╮
//! │ ✚ New Chat               │
//! │                          │
//! │ Messages  3              │
//! │ Status    Idle           │
//! │                          │
//! │ Endpoint                 │
//! │ http://localhost:5000/c… │
//! ╰──────────────────────────╯
//! ```

use chatline_engine::Phase;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::text::truncate_to_width;
use crate::theme::{BorderSet, IconSet, Theme};

/// Width of the label column in the details list.
const LABEL_WIDTH: usize = 10;

/// Sidebar widget.
pub struct Sidebar<'a> {
    theme: &'a Theme,
    icons: &'a IconSet,
    borders: &'a BorderSet,
    turn_count: usize,
    phase: Phase,
    endpoint: &'a str,
    floating: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(theme: &'a Theme, icons: &'a IconSet, borders: &'a BorderSet) -> Self {
        Self {
            theme,
            icons,
            borders,
            turn_count: 0,
            phase: Phase::Idle,
            endpoint: "",
            floating: false,
        }
    }

    #[must_use]
    pub fn turn_count(mut self, count: usize) -> Self {
        self.turn_count = count;
        self
    }

    #[must_use]
    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: &'a str) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Draw over whatever is below instead of beside it.
    #[must_use]
    pub fn floating(mut self, floating: bool) -> Self {
        self.floating = floating;
        self
    }

    /// Row holding the "New Chat" entry for a sidebar drawn in `area`.
    pub fn new_chat_row(area: Rect) -> Rect {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        Rect { height: inner.height.min(1), ..inner }
    }

    fn detail(&self, label: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!(" {label:<LABEL_WIDTH$}"),
                Style::default().fg(self.theme.muted),
            ),
            Span::styled(value, Style::default().fg(self.theme.text)),
        ])
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.floating {
            Clear.render(area, buf);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(self.borders.normal())
            .border_style(Style::default().fg(self.theme.border))
            .title(" Chat ")
            .style(Style::default().bg(self.theme.surface));
        let inner = block.inner(area);
        block.render(area, buf);

        let value_width = usize::from(inner.width).saturating_sub(1);
        let lines = vec![
            Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    format!("{} New Chat", self.icons.new_chat()),
                    Style::default()
                        .fg(self.theme.primary)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            self.detail("Messages", self.turn_count.to_string()),
            self.detail("Status", self.phase.display_name().to_string()),
            Line::from(""),
            Line::from(Span::styled(
                " Endpoint",
                Style::default().fg(self.theme.muted),
            )),
            Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    truncate_to_width(self.endpoint, value_width, self.icons.ellipsis()),
                    Style::default().fg(self.theme.subtext),
                ),
            ]),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Dims the chat behind a floating sidebar.
pub struct Overlay<'a> {
    theme: &'a Theme,
}

impl<'a> Overlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Overlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(
            area,
            Style::default().fg(self.theme.muted).bg(self.theme.overlay),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::render_widget_to_string;
    use crate::theme::IconMode;

    #[test]
    fn test_sidebar_content() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let borders = BorderSet::new(IconMode::Ascii);
        let sidebar = Sidebar::new(&theme, &icons, &borders)
            .turn_count(3)
            .phase(Phase::Sending)
            .endpoint("http://localhost:5000/chat");

        insta::assert_snapshot!(render_widget_to_string(sidebar, 24, 9), @r"
        + Chat ----------------+
        | + New Chat           |
        |                      |
        | Messages  3          |
        | Status    Sending    |
        |                      |
        | Endpoint             |
        | http://localhost:5...|
        +----------------------+
        ");
    }

    #[test]
    fn test_new_chat_row_is_first_inner_row() {
        let row = Sidebar::new_chat_row(Rect::new(0, 1, 28, 20));
        assert_eq!(row, Rect::new(1, 2, 26, 1));
    }

    #[test]
    fn test_floating_sidebar_clears_below() {
        let theme = Theme::default();
        let icons = IconSet::default();
        let borders = BorderSet::default();
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        buf.set_string(0, 3, "x".repeat(20), Style::default());

        Sidebar::new(&theme, &icons, &borders)
            .floating(true)
            .render(area, &mut buf);
        assert!(!crate::test_utils::buffer_to_string(&buf).contains('x'));
    }

    #[test]
    fn test_overlay_dims_area() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        Overlay::new(&theme).render(area, &mut buf);
        assert_eq!(buf[(1, 1)].bg, theme.overlay);
    }
}
