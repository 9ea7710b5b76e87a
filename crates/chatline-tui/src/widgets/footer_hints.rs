//! Footer bar: transient notice on the left, key hints on the right.
//!
//! Format: `Copied reply                 [Enter] send │ [Ctrl+N] new chat │ …`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::text::visual_width;
use crate::theme::{IconSet, Theme};

/// A single keybinding hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Enter", "Ctrl+N").
    pub key: &'static str,
    /// What it does.
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }

    fn width(&self) -> usize {
        visual_width(self.key) + visual_width(self.action) + 3
    }
}

/// Hints for the current state, most important first.
pub fn hints_for_state(busy: bool, overlay: bool) -> Vec<KeyHint> {
    let mut hints = Vec::new();
    if overlay {
        hints.push(KeyHint::new("Esc", "close"));
    } else if busy {
        hints.push(KeyHint::new("Esc", "stop"));
    } else {
        hints.push(KeyHint::new("Enter", "send"));
        hints.push(KeyHint::new("Ctrl+J", "newline"));
    }
    hints.push(KeyHint::new("Ctrl+N", "new chat"));
    hints.push(KeyHint::new("Ctrl+B", "sidebar"));
    hints.push(KeyHint::new("Ctrl+Y", "copy"));
    hints.push(KeyHint::new("Ctrl+C", "quit"));
    hints
}

/// Footer bar widget.
///
/// Hints that do not fit are dropped from the end.
pub struct FooterHints<'a> {
    hints: &'a [KeyHint],
    theme: &'a Theme,
    icons: &'a IconSet,
    notice: Option<&'a str>,
}

impl<'a> FooterHints<'a> {
    pub fn new(hints: &'a [KeyHint], theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            hints,
            theme,
            icons,
            notice: None,
        }
    }

    #[must_use]
    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let total = usize::from(area.width);
        let separator = self.icons.separator();
        let sep_width = visual_width(separator);

        let mut left_spans = Vec::new();
        let mut left_width = 0;
        if let Some(notice) = self.notice {
            left_spans.push(Span::styled(
                format!(" {notice}"),
                Style::default().fg(self.theme.info),
            ));
            left_width = visual_width(notice) + 1;
        }

        let mut right_spans = Vec::new();
        let mut right_width = 0;
        for (i, hint) in self.hints.iter().enumerate() {
            let extra = hint.width() + if i > 0 { sep_width } else { 0 };
            if left_width + right_width + extra + 1 > total {
                break;
            }
            if i > 0 {
                right_spans.push(Span::styled(separator, Style::default().fg(self.theme.muted)));
            }
            right_spans.push(Span::styled("[", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(hint.key, Style::default().fg(self.theme.primary)));
            right_spans.push(Span::styled("] ", Style::default().fg(self.theme.muted)));
            right_spans.push(Span::styled(hint.action, Style::default().fg(self.theme.subtext)));
            right_width += extra;
        }

        let padding = total.saturating_sub(left_width + right_width + 1);
        left_spans.push(Span::raw(" ".repeat(padding)));
        left_spans.extend(right_spans);

        Paragraph::new(Line::from(left_spans))
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
    fn test_hints_depend_on_state() {
        assert_eq!(hints_for_state(false, false)[0], KeyHint::new("Enter", "send"));
        assert_eq!(hints_for_state(true, false)[0], KeyHint::new("Esc", "stop"));
        assert_eq!(hints_for_state(true, true)[0], KeyHint::new("Esc", "close"));
    }

    #[test]
    fn test_hints_right_aligned() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let hints = [KeyHint::new("Enter", "send"), KeyHint::new("Ctrl+C", "quit")];
        let out = render_widget_to_string(FooterHints::new(&hints, &theme, &icons), 40, 1);
        assert_eq!(out, format!("{}[Enter] send | [Ctrl+C] quit", " ".repeat(11)));
    }

    #[test]
    fn test_overflowing_hints_dropped() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let hints = hints_for_state(false, false);
        let out = render_widget_to_string(FooterHints::new(&hints, &theme, &icons), 30, 1);
        assert!(out.contains("[Enter] send"));
        assert!(!out.contains("quit"));
    }

    #[test]
    fn test_notice_on_left() {
        let theme = Theme::default();
        let icons = IconSet::new(IconMode::Ascii);
        let hints = [KeyHint::new("Ctrl+C", "quit")];
        let out = render_widget_to_string(
            FooterHints::new(&hints, &theme, &icons).notice(Some("Copied reply")),
            40,
            1,
        );
        assert!(out.starts_with(" Copied reply"));
        assert!(out.ends_with("[Ctrl+C] quit"));
    }
}
