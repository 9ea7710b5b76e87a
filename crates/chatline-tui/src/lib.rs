//! chatline-tui: Terminal chat interface
//!
//! This crate provides the interactive front end for chatline:
//! - Streaming transcript with markdown and syntax-highlighted code
//! - Collapsible sidebar that floats over the chat on narrow terminals
//! - Multi-line input with history
//! - Mouse support (wheel scrolling, clickable sidebar and header)

mod app;
mod conversation;
mod event;
mod input;
mod layout;
#[cfg(test)]
pub mod test_utils;
mod text;
mod theme;
mod ui;
mod widgets;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use theme::{IconMode, Theme};
pub use chatline_engine;

use std::io::{self, stdout};
use std::sync::Arc;

use chatline_engine::{spawn_turn, ChatTransport, Config, HttpTransport};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;

/// UI tick interval; drives the typing indicator.
const TICK_RATE_MS: u64 = 200;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the chat UI until the user quits.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on
/// exit (including on error).
pub async fn run_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let http = HttpTransport::from_config(&config)?;
    info!(endpoint = %http.endpoint(), "Starting chat UI");
    let transport: Arc<dyn ChatTransport> = Arc::new(http);

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(&config, size.width, size.height, IconMode::from_env());
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events, &transport).await;

    terminal.show_cursor()?;
    info!("Chat UI closed");

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    transport: &Arc<dyn ChatTransport>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (turn_tx, mut turn_rx) = mpsc::unbounded_channel();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(event) => app.handle_event(event),
                None => break,
            },
            Some(turn_event) = turn_rx.recv() => app.handle_turn_event(turn_event),
        }

        if let Some(ticket) = app.take_ticket() {
            spawn_turn(Arc::clone(transport), ticket, turn_tx.clone());
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
