use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Message, Role};
use crate::utils::now_timestamp;

/// Title every session carries until its first user message arrives.
pub const DEFAULT_TITLE: &str = "Percakapan Baru";

/// Greeting seeded into every new session.
pub const GREETING: &str = "Halo! Saya Teman Wisata.\n\nSaya siap menemani petualanganmu di Indonesia. Mau pergi ke mana hari ini?";

/// Maximum number of characters kept when a title is derived from a message.
pub const TITLE_MAX_CHARS: usize = 30;

/// Marker appended to a title that was cut short.
const TITLE_ELLIPSIS: &str = "...";

/// A named conversation persisted in the session document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatSession {
    /// Opaque unique identifier. Never reused.
    pub id: String,

    /// Human-readable label shown in the session list.
    pub title: String,

    /// Creation time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,

    /// Ordered transcript. Append-only.
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Create a fresh session with the placeholder title and the greeting.
    ///
    /// This only constructs the session; the caller decides where it goes in
    /// the document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            timestamp: now_timestamp(),
            messages: vec![Message::assistant(GREETING)],
        }
    }

    /// Returns the last message of the transcript, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Appends a message, deriving the title when this is the first user turn.
    ///
    /// The title is rewritten only when the transcript reaches exactly two
    /// messages and the appended one is from the user.
    pub fn push(&mut self, message: Message) {
        let retitle = message.role == Role::User && self.messages.len() == 1;
        if retitle {
            self.title = derive_title(&message.content);
        }
        self.messages.push(message);
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncates `content` to [`TITLE_MAX_CHARS`] characters, adding `...` if cut.
pub fn derive_title(content: &str) -> String {
    match content.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{TITLE_ELLIPSIS}", &content[..cut]),
        None => content.to_string(),
    }
}
