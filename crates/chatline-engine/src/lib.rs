//! chatline-engine: Headless core of the chatline chat client
//!
//! This crate provides everything below the UI:
//! - Conversation log with a single in-progress assistant slot
//! - Session state (busy gate, phases, cancellation)
//! - HTTP transport streaming `POST /chat` replies as text fragments
//! - Turn driver that feeds streamed text back into the session
//! - Client configuration

pub mod config;
pub mod conversation;
pub mod decode;
pub mod session;
pub mod transport;
pub mod turn;

// Re-export commonly used types
pub use config::{Config, ConfigError, ThemeName};
pub use conversation::{Conversation, Role, Turn};
pub use decode::Utf8Decoder;
pub use session::{
    ChatSession, Phase, TurnEvent, TurnEventKind, TurnId, TurnTicket, ERROR_REPLY,
};
pub use transport::{ChatRequest, ChatTransport, HttpTransport, TextStream, TransportError};
pub use turn::{run_turn, spawn_turn, TurnEventSender};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
