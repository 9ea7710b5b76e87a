//! Frame drawing.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::App;
use crate::conversation::{render_transcript, RenderOptions, TranscriptView};
use crate::layout::{MIN_HEIGHT, MIN_WIDTH};
use crate::widgets::{hints_for_state, FooterHints, Header, InputBar, Overlay, Sidebar};

/// Draw one frame and record the regions used for mouse hit-testing.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.base).fg(app.theme.text)),
        area,
    );

    if app.shell.is_too_small() {
        app.set_layout(None, 0);
        draw_too_small(frame, app, area);
        return;
    }

    let regions = app.shell.regions(area, app.input.line_count());
    let busy = app.session.is_busy();
    let overlay = app.shell.show_overlay();

    frame.render_widget(
        Header::new(&app.theme, &app.icons)
            .phase(app.session.phase())
            .sidebar_open(app.shell.sidebar_open()),
        regions.header,
    );

    let lines = render_transcript(
        app.session.conversation(),
        &RenderOptions {
            width: usize::from(TranscriptView::text_width(regions.transcript)),
            busy,
            tick: app.tick,
            theme: &app.theme,
            icons: &app.icons,
        },
    );
    let height = usize::from(regions.transcript.height);
    app.scroll.sync(lines.len(), height);
    frame.render_widget(
        TranscriptView::new(&lines, &app.theme, &app.icons)
            .top(app.scroll.top(lines.len(), height))
            .following(app.scroll.is_following()),
        regions.transcript,
    );

    frame.render_widget(
        InputBar::new(&app.input, &app.theme, &app.icons, &app.borders)
            .focused(!overlay)
            .busy(busy),
        regions.input,
    );

    if let Some(backdrop) = regions.overlay {
        frame.render_widget(Overlay::new(&app.theme), backdrop);
    }
    if let Some(side) = regions.sidebar {
        frame.render_widget(
            Sidebar::new(&app.theme, &app.icons, &app.borders)
                .turn_count(app.session.conversation().len())
                .phase(app.session.phase())
                .endpoint(&app.endpoint)
                .floating(overlay),
            side,
        );
    }

    let hints = hints_for_state(busy, overlay);
    frame.render_widget(
        FooterHints::new(&hints, &app.theme, &app.icons).notice(app.notice.as_deref()),
        regions.footer,
    );

    app.set_layout(Some(regions), regions.transcript.height);
}

fn draw_too_small(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let message = vec![
        Line::from("Terminal too small"),
        Line::from(format!("Resize to at least {MIN_WIDTH}x{MIN_HEIGHT}")),
    ];
    let top = area.height.saturating_sub(2) / 2;
    let rect = Rect {
        y: area.y + top,
        height: area.height.saturating_sub(top).min(2),
        ..area
    };
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.warning)),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use chatline_engine::{Config, TurnEvent, TurnEventKind};

    use crate::app::App;
    use crate::event::{Action, Event};
    use crate::test_utils::render_app_to_string;
    use crate::theme::IconMode;
    use crate::widgets::{PLACEHOLDER, TITLE};

    fn app(width: u16, height: u16) -> App {
        App::new(&Config::default(), width, height, IconMode::Ascii)
    }

    #[test]
    fn test_wide_screen_docks_sidebar() {
        let mut app = app(110, 20);
        let screen = render_app_to_string(&mut app, 110, 20);

        assert!(screen.starts_with("[=] AI Professional Assistant"));
        assert!(screen.contains("| + New Chat"));
        assert!(screen.contains("* Assistant"));
        assert!(screen.contains("Hello! I am your professional AI assistant."));
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains("[Enter] send"));
    }

    #[test]
    fn test_narrow_screen_hides_sidebar() {
        let mut app = app(60, 20);
        let screen = render_app_to_string(&mut app, 60, 20);
        assert!(screen.contains(TITLE));
        assert!(!screen.contains("New Chat"));
    }

    #[test]
    fn test_narrow_sidebar_floats_and_click_dismisses() {
        let mut app = app(60, 20);
        app.handle_action(Action::ToggleSidebar);
        let screen = render_app_to_string(&mut app, 60, 20);
        assert!(screen.contains("+ New Chat"));
        assert!(screen.contains("[Esc] close"));

        app.handle_event(Event::Mouse(click(50, 10)));
        assert!(!app.shell.sidebar_open());
    }

    #[test]
    fn test_click_new_chat_clears_conversation() {
        let mut app = app(110, 20);
        render_app_to_string(&mut app, 110, 20);
        assert_eq!(app.session().conversation().len(), 1);

        // First inner row of the docked sidebar.
        app.handle_event(Event::Mouse(click(3, 2)));
        assert!(app.session().conversation().is_empty());
    }

    #[test]
    fn test_click_header_toggle() {
        let mut app = app(110, 20);
        render_app_to_string(&mut app, 110, 20);
        app.handle_event(Event::Mouse(click(1, 0)));
        assert!(!app.shell.sidebar_open());
    }

    #[test]
    fn test_typing_indicator_while_waiting() {
        let mut app = app(110, 20);
        for c in "hi".chars() {
            app.handle_action(Action::Insert(c));
        }
        app.handle_action(Action::Send);
        let ticket = app.take_ticket().unwrap();

        let screen = render_app_to_string(&mut app, 110, 20);
        assert!(screen.contains("o . ."));
        assert!(screen.contains("Waiting for reply..."));
        assert!(screen.contains("[Esc] stop"));

        app.handle_turn_event(TurnEvent::new(ticket.id, TurnEventKind::Chunk("Hello".into())));
        let screen = render_app_to_string(&mut app, 110, 20);
        assert!(screen.contains("Hello"));
        assert!(screen.contains("o . ."));

        app.handle_turn_event(TurnEvent::new(ticket.id, TurnEventKind::Finished));
        let screen = render_app_to_string(&mut app, 110, 20);
        assert!(screen.contains("Hello"));
        assert!(!screen.contains("o . ."));
    }

    #[test]
    fn test_too_small_message() {
        let mut app = app(20, 5);
        let screen = render_app_to_string(&mut app, 20, 5);
        assert!(screen.contains("Terminal too small"));
    }

    fn click(column: u16, row: u16) -> crossterm::event::MouseEvent {
        crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column,
            row,
            modifiers: crossterm::event::KeyModifiers::NONE,
        }
    }
}
