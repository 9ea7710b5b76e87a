//! Chat session: conversation log plus the busy gate.
//!
//! The session is the single owner of conversation state. Streamed output
//! reaches it as tagged [`TurnEvent`]s; events for any turn other than the
//! active one are dropped, so an aborted turn can never write into the log.
//!
//! Phases: `Idle -> Sending -> Streaming -> Idle`. Failure and cancellation
//! go straight back to `Idle`.

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::conversation::Conversation;
use crate::transport::ChatRequest;

/// Assistant reply shown for any failed turn.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Identifier of a submitted turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(u64);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the session is in the request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request outstanding.
    #[default]
    Idle,
    /// Request sent, waiting for the response to start.
    Sending,
    /// Response body is arriving.
    Streaming,
}

impl Phase {
    /// Human-readable phase name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Sending => "Sending",
            Self::Streaming => "Streaming",
        }
    }
}

/// What happened to a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEventKind {
    /// Server accepted the request; body follows.
    Connected,
    /// Decoded text fragment, in arrival order.
    Chunk(String),
    /// Body ended normally.
    Finished,
    /// Transport failed; carries the detailed error for logging.
    Failed(String),
    /// Turn was aborted before it completed.
    Cancelled,
}

/// A [`TurnEventKind`] tagged with the turn it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnEvent {
    /// Turn the event belongs to.
    pub turn: TurnId,
    /// The event itself.
    pub kind: TurnEventKind,
}

impl TurnEvent {
    /// Create a new tagged event.
    pub fn new(turn: TurnId, kind: TurnEventKind) -> Self {
        Self { turn, kind }
    }

    /// Whether this event ends its turn.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            TurnEventKind::Finished | TurnEventKind::Failed(_) | TurnEventKind::Cancelled
        )
    }
}

/// Handle for a submitted turn, consumed by the turn driver.
#[derive(Debug, Clone)]
pub struct TurnTicket {
    /// Turn identifier.
    pub id: TurnId,
    /// Payload to send.
    pub request: ChatRequest,
    /// Fires when the session abandons the turn.
    pub cancel: CancellationToken,
}

#[derive(Debug)]
struct ActiveTurn {
    id: TurnId,
    cancel: CancellationToken,
}

/// Conversation state plus the single-request gate.
#[derive(Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    phase: Phase,
    active: Option<ActiveTurn>,
    next_id: u64,
}

impl ChatSession {
    /// Create a session with an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session around an existing conversation.
    pub fn with_conversation(conversation: Conversation) -> Self {
        Self {
            conversation,
            phase: Phase::Idle,
            active: None,
            next_id: 0,
        }
    }

    /// The conversation log.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the outstanding turn, if any.
    pub fn active_turn(&self) -> Option<TurnId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Submit user text.
    ///
    /// Returns `None` (and changes nothing) for blank text or while busy.
    /// Otherwise appends the user turn and an empty assistant turn.
    pub fn submit(&mut self, text: &str) -> Option<TurnTicket> {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }
        if let Some(active) = &self.active {
            debug!(turn = %active.id, "Submit ignored while busy");
            return None;
        }

        let history = self.conversation.history();
        self.conversation.push_user(message);
        self.conversation.begin_assistant();

        self.next_id += 1;
        let id = TurnId(self.next_id);
        let cancel = CancellationToken::new();
        self.active = Some(ActiveTurn {
            id,
            cancel: cancel.clone(),
        });
        self.phase = Phase::Sending;

        info!(turn = %id, history_len = history.len(), "Turn submitted");

        Some(TurnTicket {
            id,
            request: ChatRequest {
                message: message.to_string(),
                history,
            },
            cancel,
        })
    }

    /// Apply an event from the turn driver.
    ///
    /// Returns `true` if the session changed.
    pub fn apply(&mut self, event: TurnEvent) -> bool {
        if self.active_turn() != Some(event.turn) {
            debug!(turn = %event.turn, "Dropping event for inactive turn");
            return false;
        }

        match event.kind {
            TurnEventKind::Connected => {
                self.phase = Phase::Streaming;
            }
            TurnEventKind::Chunk(text) => {
                self.phase = Phase::Streaming;
                self.conversation.append_to_last(&text);
            }
            TurnEventKind::Finished => {
                info!(turn = %event.turn, "Turn finished");
                self.release();
            }
            TurnEventKind::Failed(detail) => {
                warn!(turn = %event.turn, error = %detail, "Turn failed");
                self.conversation.set_last_content(ERROR_REPLY);
                self.release();
            }
            TurnEventKind::Cancelled => {
                self.release();
            }
        }
        true
    }

    /// Abort the outstanding turn, keeping any text already received.
    ///
    /// A placeholder that never received text is removed.
    /// Returns `true` if a turn was aborted.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                info!(turn = %active.id, "Turn cancelled");
                active.cancel.cancel();
                self.conversation.discard_empty_reply();
                self.phase = Phase::Idle;
                true
            }
            None => false,
        }
    }

    /// Start a new chat: abort any outstanding turn and clear every turn.
    pub fn reset(&mut self) {
        self.cancel();
        self.conversation.clear();
    }

    fn release(&mut self) {
        self.active = None;
        self.phase = Phase::Idle;
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            active.cancel.cancel();
        }
    }
}
