//! Text wrapping utilities for ratatui Lines.
//!
//! Widths are measured in terminal cells, so wide characters (CJK, emoji)
//! count double.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Wrap a plain text string to the specified width.
///
/// Explicit newlines are kept; blank lines survive as empty strings.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(
            textwrap::wrap(paragraph, width)
                .into_iter()
                .map(std::borrow::Cow::into_owned),
        );
    }
    out
}

/// Wrap Lines at word boundaries, preserving span styles.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

/// Split a Line at exactly `width` cells, ignoring word boundaries.
///
/// Used for code and tables where whitespace is significant.
pub fn hard_wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line];
    }

    let mut result = Vec::new();
    let mut builder = LineBuilder::default();
    let mut used = 0;

    for span in &line.spans {
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width && used > 0 {
                result.push(builder.finish());
                used = 0;
            }
            builder.push(ch, span.style);
            used += w;
        }
    }
    result.push(builder.finish());
    result
}

fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if line.width() <= width {
        return vec![line];
    }

    let styled: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let plain: String = styled.iter().map(|(ch, _)| ch).collect();

    let mut result = Vec::new();
    let mut idx = 0;

    for wrapped in textwrap::wrap(&plain, width) {
        // textwrap drops the whitespace it breaks on.
        while idx < styled.len()
            && !wrapped.starts_with(styled[idx].0)
            && styled[idx].0.is_whitespace()
        {
            idx += 1;
        }

        let mut builder = LineBuilder::default();
        for expected in wrapped.chars() {
            match styled.get(idx) {
                Some(&(ch, style)) if ch == expected => {
                    builder.push(ch, style);
                    idx += 1;
                }
                // Out of step with the source; keep textwrap's text.
                _ => builder.push(expected, Style::default()),
            }
        }
        result.push(builder.finish());
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }
    result
}

/// Accumulates characters into spans, merging runs of equal style.
#[derive(Default)]
struct LineBuilder {
    spans: Vec<Span<'static>>,
    text: String,
    style: Option<Style>,
}

impl LineBuilder {
    fn push(&mut self, ch: char, style: Style) {
        if self.style.is_some_and(|s| s != style) {
            self.flush();
        }
        self.style = Some(style);
        self.text.push(ch);
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let style = self.style.unwrap_or_default();
            self.spans
                .push(Span::styled(std::mem::take(&mut self.text), style));
        }
    }

    fn finish(&mut self) -> Line<'static> {
        self.flush();
        self.style = None;
        Line::from(std::mem::take(&mut self.spans))
    }
}
