//! Syntax highlighting for fenced code blocks.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Bundled syntect assets, loaded on first use.
struct SyntectAssets {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

fn assets() -> &'static SyntectAssets {
    static ASSETS: OnceLock<SyntectAssets> = OnceLock::new();
    ASSETS.get_or_init(|| SyntectAssets {
        syntax_set: SyntaxSet::load_defaults_newlines(),
        theme_set: ThemeSet::load_defaults(),
    })
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, lang: &str) -> Option<&'a SyntaxReference> {
    syntax_set
        .find_syntax_by_token(lang)
        .or_else(|| syntax_set.find_syntax_by_extension(lang))
}

/// Whether `lang` names a syntax we can highlight.
pub fn is_supported(lang: &str) -> bool {
    !lang.is_empty() && find_syntax(&assets().syntax_set, lang).is_some()
}

/// Highlight a code block.
///
/// Returns `None` when the language is unknown, the theme is missing or
/// highlighting fails; callers fall back to plain code styling.
pub fn highlight_block(code: &str, lang: &str, theme_name: &str) -> Option<Vec<Line<'static>>> {
    let assets = assets();
    let syntax = find_syntax(&assets.syntax_set, lang)?;
    let theme = assets
        .theme_set
        .themes
        .get(theme_name)
        .or_else(|| assets.theme_set.themes.values().next())?;

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        let ranges = highlighter.highlight_line(line, &assets.syntax_set).ok()?;
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let text = text.trim_end_matches(['\n', '\r']);
                (!text.is_empty()).then(|| Span::styled(text.to_string(), to_style(style)))
            })
            .collect();
        lines.push(Line::from(spans));
    }
    Some(lines)
}

fn to_style(style: syntect::highlighting::Style) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_supported_languages() {
        assert!(is_supported("rust"));
        assert!(is_supported("python"));
        assert!(is_supported("py"));
        assert!(!is_supported(""));
        assert!(!is_supported("no-such-language"));
    }

    #[test]
    fn test_highlight_preserves_text() {
        let code = "fn main() {\n    let x = 42;\n}\n";
        let lines = highlight_block(code, "rust", "base16-eighties.dark").unwrap();
        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(text, vec!["fn main() {", "    let x = 42;", "}"]);
    }

    #[test]
    fn test_highlight_produces_several_styles() {
        let lines = highlight_block("let x = 42;\n", "rust", "base16-eighties.dark").unwrap();
        assert!(lines[0].spans.len() > 1);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert!(highlight_block("x = 1\n", "python", "no-such-theme").is_some());
    }

    #[test]
    fn test_unknown_language_is_none() {
        assert!(highlight_block("whatever\n", "no-such-language", "base16-eighties.dark").is_none());
    }
}
