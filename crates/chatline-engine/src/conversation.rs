//! Conversation state for a single chat session.
//!
//! A [`Conversation`] is an append-only log of [`Turn`]s. The only in-place
//! mutation is on the last turn, which receives streamed assistant text.

use serde::{Deserialize, Serialize};

/// Role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl Role {
    /// Label shown above a turn in the transcript.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: String,
}

impl Turn {
    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation log.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation that opens with an assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    /// All turns in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turn, if any.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if the conversation has no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    /// Append an empty assistant turn that streamed text will fill.
    pub fn begin_assistant(&mut self) {
        self.turns.push(Turn::assistant(String::new()));
    }

    /// Append text to the last turn's content.
    ///
    /// No-op on an empty conversation.
    pub fn append_to_last(&mut self, text: &str) {
        if let Some(last) = self.turns.last_mut() {
            last.content.push_str(text);
        }
    }

    /// Replace the last turn's content.
    ///
    /// No-op on an empty conversation.
    pub fn set_last_content(&mut self, content: impl Into<String>) {
        if let Some(last) = self.turns.last_mut() {
            last.content = content.into();
        }
    }

    /// Drop the trailing assistant turn if nothing was streamed into it.
    ///
    /// Returns `true` if a turn was removed.
    pub fn discard_empty_reply(&mut self) -> bool {
        let empty = self
            .turns
            .last()
            .is_some_and(|turn| turn.role == Role::Assistant && turn.content.is_empty());
        if empty {
            self.turns.pop();
        }
        empty
    }

    /// Remove every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Snapshot of the turns to send as request history.
    ///
    /// Turns with empty content (an abandoned placeholder) are skipped.
    pub fn history(&self) -> Vec<Turn> {
        self.turns
            .iter()
            .filter(|turn| !turn.content.is_empty())
            .cloned()
            .collect()
    }

    /// Content of the latest assistant turn that has any text.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant && !turn.content.is_empty())
            .map(|turn| turn.content.as_str())
    }
}
