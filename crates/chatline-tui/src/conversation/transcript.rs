//! Transcript rendering: conversation state to styled lines.
//!
//! Rendering is a pure function of the conversation, the available width,
//! the busy flag and the animation tick, so it can be recomputed on every
//! frame and tested without a terminal.

use chatline_engine::{Conversation, Role, Turn};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::text::{render_markdown, wrap_text};
use crate::theme::{IconSet, Theme};

/// Inputs that affect the transcript besides the conversation itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Width available for text, in cells.
    pub width: usize,
    /// Whether a reply is outstanding.
    pub busy: bool,
    /// Animation frame counter.
    pub tick: u64,
    pub theme: &'a Theme,
    pub icons: &'a IconSet,
}

/// Render every turn with a role header.
///
/// While a reply is outstanding the trailing assistant turn ends with the
/// typing indicator, before and during streaming.
pub fn render_transcript(conversation: &Conversation, opts: &RenderOptions<'_>) -> Vec<Line<'static>> {
    let turns = conversation.turns();
    let mut lines = Vec::new();

    for (i, turn) in turns.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(role_header(turn.role, opts));

        if !turn.content.is_empty() {
            lines.extend(turn_body(turn, opts));
        }
        let is_trailing = i + 1 == turns.len();
        if is_trailing && opts.busy && turn.role == Role::Assistant {
            lines.push(typing_indicator(opts));
        }
    }

    lines
}

fn role_header(role: Role, opts: &RenderOptions<'_>) -> Line<'static> {
    let (icon, color) = match role {
        Role::User => (opts.icons.user(), opts.theme.user),
        Role::Assistant => (opts.icons.assistant(), opts.theme.assistant),
    };
    Line::from(vec![
        Span::styled(format!("{icon} "), Style::default().fg(color)),
        Span::styled(
            role.display_name(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn turn_body(turn: &Turn, opts: &RenderOptions<'_>) -> Vec<Line<'static>> {
    match turn.role {
        Role::Assistant => render_markdown(&turn.content, opts.width, opts.theme),
        Role::User => {
            let style = Style::default().fg(opts.theme.text);
            wrap_text(&turn.content, opts.width)
                .into_iter()
                .map(|line| Line::from(Span::styled(line, style)))
                .collect()
        }
    }
}

/// Three dots with one lit, advancing each tick.
fn typing_indicator(opts: &RenderOptions<'_>) -> Line<'static> {
    let lit = usize::try_from(opts.tick % 3).unwrap_or(0);
    let mut spans = Vec::with_capacity(3);
    for i in 0..3 {
        let (glyph, color) = if i == lit {
            (opts.icons.dot(true), opts.theme.primary)
        } else {
            (opts.icons.dot(false), opts.theme.muted)
        };
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(glyph, Style::default().fg(color)));
    }
    Line::from(spans)
}
