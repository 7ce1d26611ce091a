use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of the author of a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona instructions. Only built for outbound requests, never stored.
    System,

    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The role of the message.
    pub role: Role,

    /// The text of the message.
    pub content: String,
}

impl Message {
    /// Create a new `Message` with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Returns true if this message was written by the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

impl From<&str> for Message {
    fn from(content: &str) -> Self {
        Self::user(content)
    }
}

impl From<String> for Message {
    fn from(content: String) -> Self {
        Self::user(content)
    }
}
