//! Responsive shell: header, optional sidebar, transcript, input, footer.
//!
//! ```text
//! wide (>= breakpoint)                 narrow, sidebar open
//! ┌──────────── header ─────────────┐  ┌──────── header ────────┐
//! │ sidebar │ transcript            │  │ sidebar │░░ overlay ░░░│
//! │         │                       │  │ (float) │░░░░░░░░░░░░░░│
//! │         ├───────────────────────┤  │         │░░░░░░░░░░░░░░│
//! │         │ input                 │  │         │░░░░░░░░░░░░░░│
//! └──────────── footer ─────────────┘  └──────── footer ────────┘
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Minimum usable terminal width.
pub const MIN_WIDTH: u16 = 30;
/// Minimum usable terminal height.
pub const MIN_HEIGHT: u16 = 8;
/// Sidebar width in columns.
pub const SIDEBAR_WIDTH: u16 = 28;
/// Maximum input rows before the input scrolls.
const MAX_INPUT_ROWS: u16 = 6;

/// Sidebar visibility tracked against a width breakpoint.
///
/// Visibility defaults to open when wide and closed when narrow. Crossing
/// the breakpoint resets it to the default for the new side; resizes that
/// stay on one side keep whatever the user chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutShell {
    width: u16,
    height: u16,
    breakpoint: u16,
    sidebar_open: bool,
}

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub transcript: Rect,
    pub input: Rect,
    pub footer: Rect,
    /// Area dimmed behind a floating sidebar; clicking it dismisses.
    pub overlay: Option<Rect>,
}

impl LayoutShell {
    pub fn new(width: u16, height: u16, breakpoint: u16) -> Self {
        Self {
            width,
            height,
            breakpoint,
            sidebar_open: width >= breakpoint,
        }
    }

    pub fn is_narrow(&self) -> bool {
        self.width < self.breakpoint
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn is_too_small(&self) -> bool {
        self.width < MIN_WIDTH || self.height < MIN_HEIGHT
    }

    /// Record a new terminal size.
    pub fn resize(&mut self, width: u16, height: u16) {
        let was_narrow = self.is_narrow();
        self.width = width;
        self.height = height;
        if was_narrow != self.is_narrow() {
            self.sidebar_open = !self.is_narrow();
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Whether the sidebar floats over the chat with an overlay behind it.
    pub fn show_overlay(&self) -> bool {
        self.is_narrow() && self.sidebar_open
    }

    /// Close a floating sidebar. Returns `true` if anything changed.
    pub fn dismiss(&mut self) -> bool {
        if self.show_overlay() {
            self.sidebar_open = false;
            true
        } else {
            false
        }
    }

    /// Compute regions for `area`, sizing the input for `input_lines` rows.
    pub fn regions(&self, area: Rect, input_lines: usize) -> Regions {
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(area);

        let sidebar_width = SIDEBAR_WIDTH.min(body.width);
        let (sidebar, main, overlay) = match (self.sidebar_open, self.is_narrow()) {
            (false, _) => (None, body, None),
            (true, false) => {
                let [side, main] = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
                    .areas(body);
                (Some(side), main, None)
            }
            (true, true) => {
                let side = Rect::new(body.x, body.y, sidebar_width, body.height);
                let rest = Rect::new(
                    body.x + sidebar_width,
                    body.y,
                    body.width - sidebar_width,
                    body.height,
                );
                (Some(side), body, Some(rest))
            }
        };

        let rows = u16::try_from(input_lines.max(1))
            .unwrap_or(MAX_INPUT_ROWS)
            .min(MAX_INPUT_ROWS);
        let [transcript, input] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(rows + 2)])
            .areas(main);

        Regions {
            header,
            sidebar,
            transcript,
            input,
            footer,
            overlay,
        }
    }
}

impl Regions {
    /// Whether a click at (`column`, `row`) landed on the overlay.
    pub fn hits_overlay(&self, column: u16, row: u16) -> bool {
        self.overlay
            .is_some_and(|r| r.contains(Position::new(column, row)))
    }
}
