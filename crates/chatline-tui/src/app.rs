//! Application state and input handling.
//!
//! `App` owns the chat session and everything the screen needs. Every
//! terminal event and turn event funnels through here; drawing lives in
//! `ui`, and the run loop only moves events and tickets around.

use chatline_engine::{ChatSession, Config, Conversation, TurnEvent, TurnTicket};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use tracing::{debug, warn};

use crate::conversation::TranscriptScroll;
use crate::event::{key_to_action, Action, Event};
use crate::input::TextInputState;
use crate::layout::{LayoutShell, Regions};
use crate::theme::{BorderSet, IconMode, IconSet, Theme};
use crate::widgets::{Header, Sidebar};

/// Rows moved per mouse wheel step.
const WHEEL_STEP: usize = 3;

/// Ticks a notice stays visible (about three seconds at the UI tick rate).
const NOTICE_TICKS: u8 = 15;

/// Spaces inserted for a Tab key.
const TAB: &str = "    ";

/// Main application state.
pub struct App {
    pub(crate) session: ChatSession,
    pub(crate) shell: LayoutShell,
    pub(crate) input: TextInputState,
    pub(crate) scroll: TranscriptScroll,
    pub(crate) theme: Theme,
    pub(crate) icons: IconSet,
    pub(crate) borders: BorderSet,
    /// Endpoint shown in the sidebar.
    pub(crate) endpoint: String,
    /// Animation frame counter.
    pub(crate) tick: u64,
    /// Transient message shown in the footer.
    pub(crate) notice: Option<String>,
    notice_ttl: u8,
    should_quit: bool,
    /// Ticket waiting to be handed to the turn driver.
    pending: Option<TurnTicket>,
    /// Regions from the last draw, used for mouse hit-testing.
    regions: Option<Regions>,
    /// Transcript rows from the last draw, used for paging.
    transcript_height: u16,
}

impl App {
    /// Create the app for a terminal of `width` x `height`.
    pub fn new(config: &Config, width: u16, height: u16, icon_mode: IconMode) -> Self {
        let conversation = match config.greeting.as_deref() {
            Some(greeting) if !greeting.trim().is_empty() => {
                Conversation::with_greeting(greeting)
            }
            _ => Conversation::new(),
        };

        Self {
            session: ChatSession::with_conversation(conversation),
            shell: LayoutShell::new(width, height, config.sidebar_breakpoint),
            input: TextInputState::new(),
            scroll: TranscriptScroll::new(),
            theme: Theme::from_name(config.theme),
            icons: IconSet::new(icon_mode),
            borders: BorderSet::new(icon_mode),
            endpoint: config.endpoint.clone(),
            tick: 0,
            notice: None,
            notice_ttl: 0,
            should_quit: false,
            pending: None,
            regions: None,
            transcript_height: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Take the ticket of a just-submitted turn, if any.
    pub fn take_ticket(&mut self) -> Option<TurnTicket> {
        self.pending.take()
    }

    pub(crate) fn set_layout(&mut self, regions: Option<Regions>, transcript_height: u16) {
        self.regions = regions;
        self.transcript_height = transcript_height;
    }

    /// Dispatch a terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_action(key_to_action(key)),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Tick => self.on_tick(),
            Event::Resize(width, height) => self.shell.resize(width, height),
        }
    }

    /// Apply an event from the turn driver.
    ///
    /// Any change to the conversation jumps the transcript to the newest line.
    pub fn handle_turn_event(&mut self, event: TurnEvent) {
        if self.session.apply(event) {
            self.scroll.to_latest();
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit(),
            Action::Send => self.send(),
            Action::NewChat => self.new_chat(),
            Action::ToggleSidebar => self.shell.toggle_sidebar(),
            Action::Escape => self.escape(),
            Action::CopyReply => self.copy_reply(),
            Action::ScrollUp => self.scroll.scroll_up(1),
            Action::ScrollDown => self.scroll.scroll_down(1),
            Action::PageUp => self.scroll.scroll_up(self.page()),
            Action::PageDown => self.scroll.scroll_down(self.page()),
            Action::ScrollToLatest => self.scroll.to_latest(),
            Action::None => {}
            edit => self.edit(edit),
        }
    }

    /// Editing actions; the input is frozen while a reply is outstanding.
    fn edit(&mut self, action: Action) {
        if self.session.is_busy() {
            return;
        }
        match action {
            Action::Newline => self.input.insert('\n'),
            Action::Insert('\t') => self.input.insert_str(TAB),
            Action::Insert(c) => self.input.insert(c),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            Action::HistoryPrev => self.input.history_prev(),
            Action::HistoryNext => self.input.history_next(),
            _ => {}
        }
    }

    fn page(&self) -> usize {
        usize::from(self.transcript_height.saturating_sub(1)).max(1)
    }

    /// Submit the input as a new user turn.
    fn send(&mut self) {
        if let Some(ticket) = self.session.submit(self.input.content()) {
            self.input.submit();
            self.scroll.to_latest();
            self.pending = Some(ticket);
        }
    }

    /// Clear the conversation, aborting any reply in flight.
    fn new_chat(&mut self) {
        self.session.reset();
        self.pending = None;
        self.scroll.to_latest();
        self.shell.dismiss();
        debug!("New chat started");
    }

    /// Close a floating sidebar, else stop the reply in flight.
    fn escape(&mut self) {
        if self.shell.dismiss() {
            return;
        }
        if self.session.cancel() {
            self.set_notice("Reply stopped");
        }
    }

    fn copy_reply(&mut self) {
        let Some(reply) = self
            .session
            .conversation()
            .last_assistant_reply()
            .filter(|r| !r.is_empty())
            .map(str::to_owned)
        else {
            self.set_notice("Nothing to copy");
            return;
        };

        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(reply)) {
            Ok(()) => self.set_notice("Copied reply"),
            Err(err) => {
                warn!(error = %err, "Clipboard unavailable");
                self.set_notice("Clipboard unavailable");
            }
        }
    }

    fn quit(&mut self) {
        self.session.cancel();
        self.pending = None;
        self.should_quit = true;
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll.scroll_up(WHEEL_STEP),
            MouseEventKind::ScrollDown => self.scroll.scroll_down(WHEEL_STEP),
            MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row),
            _ => {}
        }
    }

    fn click(&mut self, column: u16, row: u16) {
        let Some(regions) = self.regions else {
            return;
        };

        if Header::hits_toggle(regions.header, column, row) {
            self.shell.toggle_sidebar();
        } else if regions
            .sidebar
            .is_some_and(|side| Sidebar::new_chat_row(side).contains(Position::new(column, row)))
        {
            self.new_chat();
        } else if regions.hits_overlay(column, row) {
            self.shell.dismiss();
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if self.session.is_busy() {
            return;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.input.insert_str(&normalized);
    }

    fn set_notice(&mut self, message: &str) {
        self.notice = Some(message.to_string());
        self.notice_ttl = NOTICE_TICKS;
    }

    /// Advance animation and expire notices.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.notice_ttl > 0 {
            self.notice_ttl -= 1;
            if self.notice_ttl == 0 {
                self.notice = None;
            }
        }
    }
}
