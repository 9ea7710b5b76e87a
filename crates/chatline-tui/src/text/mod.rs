//! Text rendering utilities.
//!
//! - [`render_markdown`] - Render markdown to styled ratatui Lines
//! - [`wrap_text`] - Plain text wrapping
//! - [`truncate_to_width`] - Width-aware truncation

mod highlight;
mod markdown;
mod styles;
mod width;
mod wrap;

pub use markdown::render_markdown;
pub use width::{truncate_to_width, visual_width};
pub use wrap::wrap_text;
