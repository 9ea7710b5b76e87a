//! UI widgets for the chat screen.
//!
//! - [`Header`] - Sidebar toggle, title and phase
//! - [`Sidebar`] / [`Overlay`] - Session panel and the dimmed backdrop behind it
//! - [`InputBar`] - Message entry
//! - [`FooterHints`] - Notices and keybinding hints

mod footer_hints;
mod header;
mod input_bar;
mod sidebar;

pub use footer_hints::{hints_for_state, FooterHints, KeyHint};
pub use header::{Header, TITLE};
pub use input_bar::{InputBar, PLACEHOLDER};
pub use sidebar::{Overlay, Sidebar};
