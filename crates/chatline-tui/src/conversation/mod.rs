//! Conversation transcript: rendering, scrolling and the pane widget.

mod scroll;
mod transcript;
mod widget;

pub use scroll::TranscriptScroll;
pub use transcript::{render_transcript, RenderOptions};
pub use widget::TranscriptView;
