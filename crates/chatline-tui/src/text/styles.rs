//! Markdown styling configuration.
//!
//! Provides [`MarkdownStyles`] which maps markdown elements to theme colors.

use ratatui::style::{Modifier, Style};

use crate::theme::Theme;

/// Styles for rendering markdown elements.
#[derive(Debug, Clone)]
pub struct MarkdownStyles {
    /// H1 header style.
    pub h1: Style,
    /// H2 header style.
    pub h2: Style,
    /// H3+ header style.
    pub h3: Style,
    /// Inline code, and code blocks with no highlightable language.
    pub code: Style,
    /// Language label above a fenced block.
    pub code_label: Style,
    /// Emphasis (italic) style.
    pub emphasis: Style,
    /// Strong (bold) style.
    pub strong: Style,
    /// Strikethrough style.
    pub strikethrough: Style,
    /// List marker (bullet/number/checkbox) style.
    pub list_marker: Style,
    /// Link text style.
    pub link: Style,
    /// Blockquote bar and text style.
    pub blockquote: Style,
    /// Table header row style.
    pub table_header: Style,
    /// Table column separators and divider.
    pub table_border: Style,
    /// Horizontal rule style.
    pub rule: Style,
    /// Normal text style.
    pub text: Style,
}

impl MarkdownStyles {
    /// Create styles from a theme.
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            h1: Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
            h2: Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(theme.secondary).bg(theme.surface),
            code_label: Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            list_marker: Style::default().fg(theme.muted),
            link: Style::default()
                .fg(theme.info)
                .add_modifier(Modifier::UNDERLINED),
            blockquote: Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::ITALIC),
            table_header: Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(theme.border),
            rule: Style::default().fg(theme.border),
            text: Style::default().fg(theme.text),
        }
    }
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}
