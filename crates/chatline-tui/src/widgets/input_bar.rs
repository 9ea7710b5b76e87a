//! Message input bar.
//!
//! Multi-line: Ctrl+J (or Alt/Shift+Enter) inserts a newline and the bar
//! grows up to the shell's row limit, then scrolls to keep the cursor in
//! view. While a reply is outstanding the bar is disabled.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::input::TextInputState;
use crate::theme::{BorderSet, IconSet, Theme};

/// Shown when the input is empty.
pub const PLACEHOLDER: &str = "Type your message here...";

const PROMPT: &str = "> ";
const CONTINUATION: &str = "  ";
const CURSOR: &str = "█";

/// Input bar widget.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    icons: &'a IconSet,
    borders: &'a BorderSet,
    focused: bool,
    busy: bool,
}

impl<'a> InputBar<'a> {
    pub fn new(
        input: &'a TextInputState,
        theme: &'a Theme,
        icons: &'a IconSet,
        borders: &'a BorderSet,
    ) -> Self {
        Self {
            input,
            theme,
            icons,
            borders,
            focused: true,
            busy: false,
        }
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Disable the bar while a reply is outstanding.
    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Display lines and the index of the line holding the cursor.
    fn build_lines(&self) -> (Vec<Line<'static>>, usize) {
        let text_style = Style::default().fg(self.theme.text);
        let prompt_style = Style::default().fg(self.theme.primary);
        let show_cursor = self.focused && !self.busy;

        if self.input.is_empty() {
            let mut spans = vec![Span::styled(PROMPT, prompt_style)];
            if show_cursor {
                spans.push(Span::styled(CURSOR, text_style));
            }
            spans.push(Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)));
            return (vec![Line::from(spans)], 0);
        }

        let (before, _) = self.input.split_at_cursor();
        let cursor_line = before.matches('\n').count();
        let before_cursor_col = before.rsplit('\n').next().unwrap_or("").len();

        let mut lines = Vec::new();
        for (idx, text) in self.input.content().split('\n').enumerate() {
            let prefix = if idx == 0 {
                Span::styled(PROMPT, prompt_style)
            } else {
                Span::raw(CONTINUATION)
            };
            let mut spans = vec![prefix];
            if show_cursor && idx == cursor_line {
                let (head, tail) = text.split_at(before_cursor_col);
                spans.push(Span::styled(head.to_string(), text_style));
                spans.push(Span::styled(CURSOR, text_style));
                spans.push(Span::styled(tail.to_string(), text_style));
            } else {
                spans.push(Span::styled(text.to_string(), text_style));
            }
            lines.push(Line::from(spans));
        }

        (lines, cursor_line)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (border_set, border_color) = if self.focused && !self.busy {
            (self.borders.focused(), self.theme.border_focused)
        } else {
            (self.borders.normal(), self.theme.border)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border_set)
            .border_style(Style::default().fg(border_color));

        if self.busy {
            let waiting = Line::from(vec![
                Span::styled(
                    format!("{} ", self.icons.dot(true)),
                    Style::default().fg(self.theme.warning),
                ),
                Span::styled(
                    format!("Waiting for reply{}", self.icons.ellipsis()),
                    Style::default().fg(self.theme.muted),
                ),
            ]);
            Paragraph::new(waiting).block(block).render(area, buf);
            return;
        }

        let inner_height = usize::from(area.height.saturating_sub(2));
        let (lines, cursor_line) = self.build_lines();
        let scroll = if lines.len() <= inner_height {
            0
        } else {
            cursor_line.saturating_sub(inner_height.saturating_sub(1))
        };

        Paragraph::new(lines)
            .block(block)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}
