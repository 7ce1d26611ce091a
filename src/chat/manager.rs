//! Session lifecycle with persistence.
//!
//! [`SessionManager`] owns the in-memory [`SessionDocument`] and writes the
//! whole document back to its [`SessionStore`] after every mutation. A
//! mutation whose write fails is undone, so memory never runs ahead of disk.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::observability::{SESSIONS_CREATED, SESSIONS_DELETED};
use crate::store::SessionStore;
use crate::types::{ChatSession, Message, SessionDocument};

/// Create, select, append to, and delete chat sessions.
pub struct SessionManager {
    store: SessionStore,
    document: SessionDocument,
}

impl SessionManager {
    /// Opens the store, creating the first session if the document is empty.
    pub fn open(store: SessionStore) -> Result<Self> {
        let document = store.initialize()?;
        Ok(Self { store, document })
    }

    /// Builds a fresh session without inserting it anywhere.
    pub fn create_session() -> ChatSession {
        SESSIONS_CREATED.click();
        ChatSession::new()
    }

    /// Returns the underlying document.
    pub fn document(&self) -> &SessionDocument {
        &self.document
    }

    /// Returns the backing store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns every session, in list order.
    pub fn sessions(&self) -> &[ChatSession] {
        &self.document.conversations
    }

    /// Returns the active session.
    pub fn current(&self) -> Option<&ChatSession> {
        self.document.current()
    }

    /// Resolves a list position or id prefix to a session id.
    pub fn resolve(&self, selector: &str) -> Result<String> {
        self.document
            .resolve(selector)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::validation(
                    format!("no chat matches '{}'", selector.trim()),
                    Some("chat".to_string()),
                )
            })
    }

    /// Starts a new chat at the top of the list and makes it current.
    pub fn new_chat(&mut self) -> Result<&ChatSession> {
        let before = self.document.clone();
        let session = Self::create_session();
        info!(id = %session.id, "new chat");
        self.document.insert_front(session);
        self.commit(before)?;
        Ok(&self.document.conversations[0])
    }

    /// Makes the session with `id` current.
    pub fn select(&mut self, id: &str) -> Result<()> {
        let before = self.document.clone();
        if !self.document.select(id) {
            return Err(Error::validation(
                format!("unknown chat id {id}"),
                Some("chat".to_string()),
            ));
        }
        self.commit(before)
    }

    /// Appends `message` to the current session and persists.
    ///
    /// The first user message of a session also becomes its title.
    pub fn append_message(&mut self, message: Message) -> Result<()> {
        let before = self.document.clone();
        if !self.document.push_message(message) {
            return Err(Error::validation("there is no chat to append to", None));
        }
        self.commit(before)
    }

    /// Deletes the session with `id` and persists.
    ///
    /// The document always keeps at least one session: deleting the last one
    /// replaces it with a fresh chat.
    pub fn delete_session(&mut self, id: &str) -> Result<()> {
        let before = self.document.clone();
        if !self.document.remove_session(id) {
            return Err(Error::validation(
                format!("unknown chat id {id}"),
                Some("chat".to_string()),
            ));
        }
        let replaced = self.document.conversations.len() == before.conversations.len();
        self.commit(before)?;
        SESSIONS_DELETED.click();
        if replaced {
            // The deleted chat was the last one and got replaced.
            SESSIONS_CREATED.click();
        }
        info!(id, "deleted chat");
        Ok(())
    }

    /// Persists the document, restoring `before` if the write fails.
    fn commit(&mut self, before: SessionDocument) -> Result<()> {
        if let Err(err) = self.store.save(&self.document) {
            warn!(error = %err, "session history not saved, change undone");
            self.document = before;
            return Err(err);
        }
        Ok(())
    }
}
