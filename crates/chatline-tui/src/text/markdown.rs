//! Markdown rendering using pulldown-cmark.
//!
//! Provides [`render_markdown`] to convert markdown text to styled ratatui Lines.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

use super::highlight;
use super::styles::MarkdownStyles;
use super::wrap::{hard_wrap_line, wrap_lines};

/// Indent applied to code block lines.
const CODE_INDENT: &str = "  ";

/// Render markdown text to styled ratatui Lines.
///
/// Prose is wrapped to `width` columns; code blocks and tables keep their
/// layout and are hard-wrapped only when wider than `width`. A `width` of 0
/// disables wrapping.
pub fn render_markdown(input: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);
    let mut renderer = MarkdownRenderer::new(MarkdownStyles::from_theme(theme), theme, width);
    renderer.run(parser);

    let mut lines = renderer.lines;
    while lines.last().is_some_and(|l| l.width() == 0) {
        lines.pop();
    }
    lines
}

/// Fenced or indented code block being collected.
struct CodeBlock {
    lang: String,
    code: String,
}

/// Table being collected; rendered once complete.
#[derive(Default)]
struct TableBuffer {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: Option<String>,
    in_head: bool,
}

struct MarkdownRenderer<'t> {
    lines: Vec<Line<'static>>,
    styles: MarkdownStyles,
    theme: &'t Theme,
    width: usize,
    /// Stack of active inline styles.
    style_stack: Vec<Style>,
    current_spans: Vec<Span<'static>>,
    /// Ordered lists carry their next number; bullet lists carry `None`.
    list_stack: Vec<Option<u64>>,
    code_block: Option<CodeBlock>,
    table: Option<TableBuffer>,
    blockquote_depth: usize,
    pending_list_marker: Option<String>,
    task_checkbox: Option<bool>,
}

impl<'t> MarkdownRenderer<'t> {
    fn new(styles: MarkdownStyles, theme: &'t Theme, width: usize) -> Self {
        Self {
            lines: Vec::new(),
            styles,
            theme,
            width,
            style_stack: Vec::new(),
            current_spans: Vec::new(),
            list_stack: Vec::new(),
            code_block: None,
            table: None,
            blockquote_depth: 0,
            pending_list_marker: None,
            task_checkbox: None,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    #[allow(clippy::too_many_lines)]
    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                self.style_stack.push(self.heading_style(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
                self.blank_line();
            }

            Event::Start(Tag::Emphasis) => self.style_stack.push(self.styles.emphasis),
            Event::Start(Tag::Strong) => self.style_stack.push(self.styles.strong),
            Event::Start(Tag::Strikethrough) => self.style_stack.push(self.styles.strikethrough),
            Event::Start(Tag::Link { .. }) => self.style_stack.push(self.styles.link),
            Event::End(
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link,
            ) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_line();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split(|c: char| c.is_whitespace() || c == ',')
                        .next()
                        .unwrap_or_default()
                        .to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code_block = Some(CodeBlock {
                    lang,
                    code: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = self.code_block.take() {
                    self.emit_code_block(&block);
                }
                self.blank_line();
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.pending_list_marker = Some(marker);
            }
            Event::End(TagEnd::Item) => {
                self.flush_line();
                self.task_checkbox = None;
            }
            Event::TaskListMarker(checked) => self.task_checkbox = Some(checked),

            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.blockquote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.blockquote_depth = self.blockquote_depth.saturating_sub(1);
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }

            Event::Start(Tag::Table(_)) => {
                self.flush_line();
                self.table = Some(TableBuffer::default());
            }
            Event::End(TagEnd::Table) => {
                if let Some(table) = self.table.take() {
                    self.emit_table(&table);
                }
                self.blank_line();
            }
            Event::Start(Tag::TableHead) => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            Event::End(TagEnd::TableHead) => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.current_row);
                    table.in_head = false;
                }
            }
            Event::End(TagEnd::TableRow) => {
                if let Some(table) = self.table.as_mut() {
                    if !table.in_head {
                        let row = std::mem::take(&mut table.current_row);
                        table.rows.push(row);
                    }
                }
            }
            Event::Start(Tag::TableCell) => {
                if let Some(table) = self.table.as_mut() {
                    table.current_cell = Some(String::new());
                }
            }
            Event::End(TagEnd::TableCell) => {
                if let Some(table) = self.table.as_mut() {
                    let cell = table.current_cell.take().unwrap_or_default();
                    table.current_row.push(cell);
                }
            }

            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => {
                if let Some(cell) = self.table_cell() {
                    cell.push_str(&code);
                } else {
                    self.push_prefixes();
                    self.current_spans
                        .push(Span::styled(code.to_string(), self.styles.code));
                }
            }
            Event::SoftBreak => self.add_text(" "),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                let len = if self.width == 0 { 40 } else { self.width.min(40) };
                self.lines
                    .push(Line::from(Span::styled("─".repeat(len), self.styles.rule)));
                self.blank_line();
            }
            Event::Html(html) => {
                self.add_text(html.trim_end_matches('\n'));
                self.flush_line();
            }
            Event::InlineHtml(html) => self.add_text(&html),

            Event::Start(
                Tag::Paragraph
                | Tag::TableRow
                | Tag::Image { .. }
                | Tag::FootnoteDefinition(_)
                | Tag::MetadataBlock(_)
                | Tag::HtmlBlock,
            )
            | Event::End(
                TagEnd::Image
                | TagEnd::FootnoteDefinition
                | TagEnd::MetadataBlock(_)
                | TagEnd::HtmlBlock,
            )
            | Event::FootnoteReference(_) => {}
        }
    }

    fn table_cell(&mut self) -> Option<&mut String> {
        self.table.as_mut().and_then(|t| t.current_cell.as_mut())
    }

    fn add_text(&mut self, text: &str) {
        if let Some(block) = self.code_block.as_mut() {
            block.code.push_str(text);
            return;
        }
        if let Some(cell) = self.table_cell() {
            cell.push_str(text);
            return;
        }

        self.push_prefixes();
        let style = self.current_style();
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    /// Blockquote bar and pending list marker for a fresh line.
    fn push_prefixes(&mut self) {
        if self.current_spans.is_empty() && self.blockquote_depth > 0 {
            self.current_spans.push(Span::styled(
                "> ".repeat(self.blockquote_depth),
                self.styles.blockquote,
            ));
        }
        if let Some(marker) = self.pending_list_marker.take() {
            self.current_spans
                .push(Span::styled(marker, self.styles.list_marker));
            if let Some(checked) = self.task_checkbox.take() {
                let checkbox = if checked { "[x] " } else { "[ ] " };
                self.current_spans
                    .push(Span::styled(checkbox, self.styles.list_marker));
            }
        }
    }

    fn current_style(&self) -> Style {
        let base = if self.blockquote_depth > 0 {
            self.styles.text.patch(self.styles.blockquote)
        } else {
            self.styles.text
        };
        self.style_stack.iter().fold(base, |acc, s| acc.patch(*s))
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.styles.h1,
            HeadingLevel::H2 => self.styles.h2,
            _ => self.styles.h3,
        }
    }

    fn emit_code_block(&mut self, block: &CodeBlock) {
        let code = block.code.strip_suffix('\n').unwrap_or(&block.code);
        let highlighted = if highlight::is_supported(&block.lang) {
            highlight::highlight_block(code, &block.lang, self.theme.syntax_theme)
        } else {
            None
        };

        let body: Vec<Line<'static>> = match highlighted {
            Some(lines) => {
                self.lines.push(Line::from(Span::styled(
                    block.lang.clone(),
                    self.styles.code_label,
                )));
                lines
                    .into_iter()
                    .map(|line| {
                        let mut spans = vec![Span::raw(CODE_INDENT)];
                        spans.extend(line.spans);
                        Line::from(spans)
                    })
                    .collect()
            }
            None => code
                .split('\n')
                .map(|line| {
                    Line::from(vec![
                        Span::raw(CODE_INDENT),
                        Span::styled(line.to_string(), self.styles.code),
                    ])
                })
                .collect(),
        };

        for line in body {
            self.lines.extend(hard_wrap_line(line, self.width));
        }
    }

    fn emit_table(&mut self, table: &TableBuffer) {
        let columns = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.header.len()))
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&table.header).chain(&table.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let header = self.table_row(&table.header, &widths, self.styles.table_header);
        self.lines.extend(hard_wrap_line(header, self.width));

        let divider = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");
        self.lines.extend(hard_wrap_line(
            Line::from(Span::styled(divider, self.styles.table_border)),
            self.width,
        ));

        for row in &table.rows {
            let line = self.table_row(row, &widths, self.styles.text);
            self.lines.extend(hard_wrap_line(line, self.width));
        }
    }

    fn table_row(&self, cells: &[String], widths: &[usize], style: Style) -> Line<'static> {
        let mut spans = Vec::with_capacity(widths.len() * 2);
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", self.styles.table_border));
            }
            let cell = cells.get(i).map_or("", String::as_str);
            let pad = width.saturating_sub(cell.width());
            spans.push(Span::styled(format!("{cell}{}", " ".repeat(pad)), style));
        }
        Line::from(spans)
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|l| l.width() == 0) || self.lines.is_empty() {
            return;
        }
        self.lines.push(Line::from(""));
    }

    fn flush_line(&mut self) {
        if self.current_spans.is_empty() {
            return;
        }
        let line = Line::from(std::mem::take(&mut self.current_spans));
        self.lines.extend(wrap_lines(vec![line], self.width));
    }
}
