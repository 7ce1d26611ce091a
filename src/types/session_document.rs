use serde::{Deserialize, Serialize};

use crate::types::{ChatSession, Message};

/// The persisted unit: every chat session plus which one is active.
///
/// The operations here are pure; persistence is layered on by
/// [`crate::chat::SessionManager`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDocument {
    /// Sessions, newest interactive chat first.
    pub conversations: Vec<ChatSession>,

    /// Identifier of the active session.
    pub current_chat_id: Option<String>,
}

impl SessionDocument {
    /// An empty document with no sessions and no current id.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Makes sure at least one session exists, appending a fresh one if not.
    ///
    /// Returns true if the document was changed.
    pub fn ensure_session(&mut self) -> bool {
        if !self.conversations.is_empty() {
            return false;
        }
        let session = ChatSession::new();
        self.current_chat_id = Some(session.id.clone());
        self.conversations.push(session);
        true
    }

    /// Returns the index of the session with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.conversations.iter().position(|chat| chat.id == id)
    }

    fn current_index(&self) -> Option<usize> {
        if self.conversations.is_empty() {
            return None;
        }
        let found = self
            .current_chat_id
            .as_deref()
            .and_then(|id| self.position(id));
        // A stale id falls back to the first session.
        Some(found.unwrap_or(0))
    }

    /// Returns the active session, falling back to the first one if the
    /// current id is stale. `None` only when there are no sessions at all.
    pub fn current(&self) -> Option<&ChatSession> {
        self.current_index().map(|idx| &self.conversations[idx])
    }

    /// Mutable counterpart of [`Self::current`].
    pub fn current_mut(&mut self) -> Option<&mut ChatSession> {
        self.current_index().map(|idx| &mut self.conversations[idx])
    }

    /// Returns true if `id` names the active session.
    pub fn is_current(&self, id: &str) -> bool {
        self.current().is_some_and(|chat| chat.id == id)
    }

    /// Inserts a session at the front and makes it current.
    pub fn insert_front(&mut self, session: ChatSession) {
        self.current_chat_id = Some(session.id.clone());
        self.conversations.insert(0, session);
    }

    /// Switches to the session with the given id.
    ///
    /// Returns false, leaving the document untouched, if no such session exists.
    pub fn select(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.current_chat_id = Some(id.to_string());
        true
    }

    /// Appends a message to the active session, applying the title rule.
    ///
    /// Returns false if there is no session to append to.
    pub fn push_message(&mut self, message: Message) -> bool {
        match self.current_mut() {
            Some(chat) => {
                chat.push(message);
                true
            }
            None => false,
        }
    }

    /// Removes the session with the given id.
    ///
    /// If the current id no longer resolves afterwards, the first remaining
    /// session becomes current; if
    /// none remain, a fresh session is appended and made current. Returns
    /// false if no session had that id.
    pub fn remove_session(&mut self, id: &str) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.conversations.remove(idx);
        let dangling = self
            .current_chat_id
            .as_deref()
            .and_then(|current| self.position(current))
            .is_none();
        if dangling {
            match self.conversations.first() {
                Some(first) => self.current_chat_id = Some(first.id.clone()),
                None => {
                    let session = ChatSession::new();
                    self.current_chat_id = Some(session.id.clone());
                    self.conversations.push(session);
                }
            }
        }
        true
    }

    /// Resolves a user-supplied selector to a session id.
    ///
    /// A selector is either a 1-based position in the session list or a
    /// prefix of exactly one session id.
    pub fn resolve(&self, selector: &str) -> Option<&str> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        if let Ok(n) = selector.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|idx| self.conversations.get(idx))
                .map(|chat| chat.id.as_str());
        }
        let mut matches = self
            .conversations
            .iter()
            .filter(|chat| chat.id.starts_with(selector));
        match (matches.next(), matches.next()) {
            (Some(chat), None) => Some(chat.id.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_TITLE, Role};

    fn document_with(n: usize) -> SessionDocument {
        let mut doc = SessionDocument::empty();
        for _ in 0..n {
            doc.insert_front(ChatSession::new());
        }
        doc
    }

    fn current_is_valid(doc: &SessionDocument) -> bool {
        doc.current_chat_id
            .as_deref()
            .is_some_and(|id| doc.position(id).is_some())
    }

    #[test]
    fn ensure_session_on_empty_document() {
        let mut doc = SessionDocument::empty();
        assert!(doc.current().is_none());
        assert!(doc.ensure_session());
        assert_eq!(doc.conversations.len(), 1);
        let chat = doc.current().unwrap();
        assert_eq!(chat.title, DEFAULT_TITLE);
        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.messages[0].role, Role::Assistant);
        assert!(!doc.ensure_session());
    }

    #[test]
    fn insert_front_becomes_current() {
        let mut doc = document_with(1);
        let session = ChatSession::new();
        let id = session.id.clone();
        doc.insert_front(session);
        assert_eq!(doc.conversations[0].id, id);
        assert!(doc.is_current(&id));
    }

    #[test]
    fn stale_current_falls_back_to_first() {
        let mut doc = document_with(2);
        doc.current_chat_id = Some("gone".to_string());
        assert_eq!(doc.current().unwrap().id, doc.conversations[0].id);
    }

    #[test]
    fn select_unknown_is_noop() {
        let mut doc = document_with(2);
        let before = doc.current_chat_id.clone();
        assert!(!doc.select("nope"));
        assert_eq!(doc.current_chat_id, before);
    }

    #[test]
    fn push_message_targets_current() {
        let mut doc = document_with(2);
        let other = doc.conversations[1].id.clone();
        assert!(doc.select(&other));
        assert!(doc.push_message(Message::user("Halo")));
        assert_eq!(doc.conversations[1].messages.len(), 2);
        assert_eq!(doc.conversations[1].title, "Halo");
        assert_eq!(doc.conversations[0].messages.len(), 1);
    }

    #[test]
    fn delete_current_moves_to_first_remaining() {
        let mut doc = document_with(3);
        let current = doc.current_chat_id.clone().unwrap();
        assert!(doc.remove_session(&current));
        assert_eq!(doc.conversations.len(), 2);
        assert_eq!(doc.current_chat_id.as_deref(), Some(doc.conversations[0].id.as_str()));
    }

    #[test]
    fn delete_other_keeps_current() {
        let mut doc = document_with(3);
        let current = doc.current_chat_id.clone().unwrap();
        let other = doc.conversations[2].id.clone();
        assert!(doc.remove_session(&other));
        assert_eq!(doc.current_chat_id, Some(current));
    }

    #[test]
    fn delete_only_session_creates_new_one() {
        let mut doc = document_with(1);
        let only = doc.conversations[0].id.clone();
        assert!(doc.remove_session(&only));
        assert_eq!(doc.conversations.len(), 1);
        assert_ne!(doc.conversations[0].id, only);
        assert!(current_is_valid(&doc));
        assert_eq!(doc.conversations[0].title, DEFAULT_TITLE);
    }

    #[test]
    fn delete_unknown_is_noop() {
        let mut doc = document_with(2);
        let before = doc.clone();
        assert!(!doc.remove_session("missing"));
        assert_eq!(doc, before);
    }

    #[test]
    fn never_empty_across_delete_sequences() {
        // Drive a deterministic mix of creates and deletes from a small LCG.
        let mut doc = document_with(1);
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            if seed % 3 == 0 {
                doc.insert_front(ChatSession::new());
            } else {
                let idx = (seed as usize / 3) % doc.conversations.len();
                let id = doc.conversations[idx].id.clone();
                assert!(doc.remove_session(&id));
            }
            assert!(!doc.is_empty());
            assert!(current_is_valid(&doc));
        }
    }

    #[test]
    fn resolve_by_index_and_prefix() {
        let doc = document_with(3);
        assert_eq!(doc.resolve("1"), Some(doc.conversations[0].id.as_str()));
        assert_eq!(doc.resolve("3"), Some(doc.conversations[2].id.as_str()));
        assert_eq!(doc.resolve("0"), None);
        assert_eq!(doc.resolve("4"), None);
        let id = doc.conversations[1].id.clone();
        assert_eq!(doc.resolve(&id), Some(id.as_str()));
        assert_eq!(doc.resolve(""), None);
    }

    #[test]
    fn serialized_shape_matches_history_file() {
        let doc = document_with(1);
        let value = serde_json::to_value(&doc).unwrap();
        let chat = &value["conversations"][0];
        assert!(chat["id"].is_string());
        assert_eq!(chat["title"], DEFAULT_TITLE);
        assert!(chat["timestamp"].is_string());
        assert_eq!(chat["messages"][0]["role"], "assistant");
        assert!(value["current_chat_id"].is_string());
    }

    #[test]
    fn parses_empty_history_file() {
        let doc: SessionDocument =
            serde_json::from_str(r#"{"conversations": [], "current_chat_id": null}"#).unwrap();
        assert_eq!(doc, SessionDocument::empty());
    }
}
