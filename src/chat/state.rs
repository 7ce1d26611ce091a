//! Explicit interaction state.
//!
//! UI state lives in [`InteractionContext`], and whether the assistant owes
//! a reply is derived from the transcript by [`ChatState::of`].

use std::fmt;

use crate::types::{ChatSession, Region};

/// Whether the current session is waiting on the assistant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChatState {
    /// The last message is from the assistant.
    Idle,

    /// The last message is from the user and has not been answered yet.
    PendingResponse,
}

impl ChatState {
    /// Derives the state of a session from its last message.
    pub fn of(session: &ChatSession) -> Self {
        match session.last_message() {
            Some(message) if message.is_user() => ChatState::PendingResponse,
            _ => ChatState::Idle,
        }
    }

    /// Returns true if a completion should be requested.
    pub fn is_pending(&self) -> bool {
        matches!(self, ChatState::PendingResponse)
    }
}

impl fmt::Display for ChatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatState::Idle => write!(f, "idle"),
            ChatState::PendingResponse => write!(f, "pending response"),
        }
    }
}

/// Per-interaction UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionContext {
    /// Regional focus applied to outbound questions.
    pub region: Option<Region>,

    /// A suggested question waiting to be submitted.
    pub quick_question: Option<String>,
}

impl InteractionContext {
    /// Clears the regional focus. Used whenever the active chat changes.
    pub fn reset_region(&mut self) {
        self.region = None;
    }

    /// Text shown in the input prompt.
    pub fn placeholder(&self) -> String {
        match &self.region {
            Some(region) => format!("Tanya tentang budaya {region}..."),
            None => "Tanya tentang budaya Indonesia...".to_string(),
        }
    }
}
