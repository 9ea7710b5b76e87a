//! Layout components for the TUI.
//!
//! - [`LayoutShell`] - Breakpoint-aware sidebar state and region split
//! - [`Regions`] - Rectangles for one frame

mod shell;

pub use shell::{LayoutShell, Regions, MIN_HEIGHT, MIN_WIDTH};
