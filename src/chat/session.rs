//! Core chat application state.
//!
//! This module provides [`ChatApp`], which ties the stores, the session
//! manager, and the completion client together and turns user actions into
//! discrete state transitions.

use tracing::{info, warn};

use crate::chat::config::ChatConfig;
use crate::chat::manager::SessionManager;
use crate::chat::state::{ChatState, InteractionContext};
use crate::client::OpenRouter;
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::store::{CredentialStore, SessionStore};
use crate::types::{ChatSession, Message, Model, Region};

/// Questions offered while a chat still only holds the greeting.
pub static SUGGESTIONS: [&str; 5] = [
    "Ceritakan tentang Upacara Ngaben di Bali",
    "Apa makanan khas Yogyakarta?",
    "Bagaimana sejarah Batik?",
    "Rekomendasi tempat wisata budaya di Jawa Barat",
    "Apa makna filosofi Rendang?",
];

/// Shown while waiting for the assistant.
pub const LOADING_TEXT: &str = "Mencari kebijaksanaan lokal...";

/// Shown after a failed completion, below the specific error.
pub const FAILURE_NOTICE: &str = "Maaf, terjadi kesalahan. Cek API Key atau koneksi Anda.";

/// Shown when a message is submitted without an API key.
pub const MISSING_KEY_NOTICE: &str =
    "Silakan masukkan API Key OpenRouter untuk memulai percakapan (/key <api-key>).";

/// Snapshot of what the status line displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStatus {
    /// Whether an API key is configured.
    pub api_key_active: bool,
    /// The model used for replies.
    pub model: Model,
    /// The regional focus, if any.
    pub region: Option<Region>,
    /// Title of the current chat.
    pub current_title: String,
    /// Number of messages in the current chat.
    pub message_count: usize,
    /// Number of chats.
    pub chat_count: usize,
    /// Whether the current chat is waiting on a reply.
    pub state: ChatState,
}

impl AppStatus {
    /// Label for the API key state.
    pub fn api_key_label(&self) -> &'static str {
        if self.api_key_active {
            "Aktif"
        } else {
            "Tidak Aktif"
        }
    }
}

/// The chat application: persisted sessions plus one completion client.
pub struct ChatApp {
    client: OpenRouter,
    credentials: CredentialStore,
    sessions: SessionManager,
    context: InteractionContext,
    model: Model,
}

impl ChatApp {
    /// Opens the stores named by `config` and builds the client.
    ///
    /// The saved API key wins over the environment.
    pub fn open(config: &ChatConfig) -> Result<Self> {
        let credentials = CredentialStore::new(&config.key_file);
        let saved_key = credentials.load();
        let client = OpenRouter::with_options(Some(saved_key), Some(&config.base_url), None)?;
        let sessions = SessionManager::open(SessionStore::new(&config.history_file))?;
        Ok(Self::with_parts(
            client,
            credentials,
            sessions,
            config.model.clone(),
        ))
    }

    /// Assembles an application from already-built parts.
    pub fn with_parts(
        client: OpenRouter,
        credentials: CredentialStore,
        sessions: SessionManager,
        model: Model,
    ) -> Self {
        Self {
            client,
            credentials,
            sessions,
            context: InteractionContext::default(),
            model,
        }
    }

    /// Returns the session manager.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Returns the interaction context.
    pub fn context(&self) -> &InteractionContext {
        &self.context
    }

    /// Returns the active chat.
    pub fn current(&self) -> Option<&ChatSession> {
        self.sessions.current()
    }

    /// Returns whether the active chat is waiting on a reply.
    pub fn state(&self) -> ChatState {
        self.current().map(ChatState::of).unwrap_or(ChatState::Idle)
    }

    /// Returns the status line snapshot.
    pub fn status(&self) -> AppStatus {
        let current = self.current();
        AppStatus {
            api_key_active: self.client.has_api_key(),
            model: self.model.clone(),
            region: self.context.region.clone(),
            current_title: current.map(|chat| chat.title.clone()).unwrap_or_default(),
            message_count: current.map(ChatSession::message_count).unwrap_or(0),
            chat_count: self.sessions.sessions().len(),
            state: self.state(),
        }
    }

    /// Returns the suggested questions while the active chat only holds its
    /// greeting.
    pub fn suggestions(&self) -> Option<&'static [&'static str]> {
        match self.current() {
            Some(chat) if chat.message_count() == 1 => Some(&SUGGESTIONS[..]),
            _ => None,
        }
    }

    /// Saves `secret` as the API key if it differs from the saved one.
    ///
    /// Returns true if the key was written.
    pub fn set_api_key(&mut self, secret: &str) -> Result<bool> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(Error::validation("API key must not be empty", None));
        }
        self.client.set_api_key(secret);
        if self.credentials.load() == secret {
            return Ok(false);
        }
        self.credentials.save(secret)?;
        info!(path = %self.credentials.path().display(), "api key saved");
        Ok(true)
    }

    /// Sets or clears the regional focus.
    pub fn set_region(&mut self, region: Option<Region>) {
        self.context.region = region;
    }

    /// Starts a new chat and clears the regional focus.
    pub fn new_chat(&mut self) -> Result<&ChatSession> {
        self.context.reset_region();
        self.sessions.new_chat()
    }

    /// Switches to the chat named by `selector` and clears the regional focus.
    pub fn select(&mut self, selector: &str) -> Result<&ChatSession> {
        let id = self.sessions.resolve(selector)?;
        self.sessions.select(&id)?;
        self.context.reset_region();
        self.sessions
            .current()
            .ok_or_else(|| Error::validation("there is no current chat", None))
    }

    /// Deletes the chat named by `selector`.
    ///
    /// Returns the title of the deleted chat.
    pub fn delete(&mut self, selector: &str) -> Result<String> {
        let id = self.sessions.resolve(selector)?;
        let title = self
            .sessions
            .sessions()
            .iter()
            .find(|chat| chat.id == id)
            .map(|chat| chat.title.clone())
            .unwrap_or_default();
        self.sessions.delete_session(&id)?;
        Ok(title)
    }

    /// Appends a user message to the active chat: `Idle -> PendingResponse`.
    ///
    /// Without an API key nothing is appended.
    pub fn submit(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::validation("message must not be empty", None));
        }
        if !self.client.has_api_key() {
            return Err(Error::precondition(MISSING_KEY_NOTICE));
        }
        self.sessions.append_message(Message::user(text))
    }

    /// Queues and submits the `n`-th suggested question (1-based).
    pub fn ask_suggestion(&mut self, n: usize) -> Result<()> {
        let Some(suggestions) = self.suggestions() else {
            return Err(Error::validation(
                "suggestions are only offered in a fresh chat",
                None,
            ));
        };
        let question = n
            .checked_sub(1)
            .and_then(|idx| suggestions.get(idx))
            .ok_or_else(|| {
                Error::validation(
                    format!("choose a suggestion between 1 and {}", suggestions.len()),
                    Some("n".to_string()),
                )
            })?;
        self.context.quick_question = Some(question.to_string());
        self.submit_quick_question()
    }

    /// Submits the queued quick question, if any.
    ///
    /// The question is dropped when no API key is set.
    pub fn submit_quick_question(&mut self) -> Result<()> {
        match self.context.quick_question.take() {
            Some(question) => self.submit(&question),
            None => Ok(()),
        }
    }

    /// Requests the assistant's reply: `PendingResponse -> Idle`.
    ///
    /// On success the reply is appended and returned. On failure the chat is
    /// left unchanged, so the unanswered user message can be retried.
    pub async fn respond(&mut self) -> Result<String> {
        let text = self.fetch_reply().await?;
        self.sessions
            .append_message(Message::assistant(text.clone()))?;
        Ok(text)
    }

    /// Asks again for the reply to a message a failed request left unanswered.
    pub async fn retry(&mut self) -> Result<String> {
        self.respond().await
    }

    /// Asks the client to answer the pending message without touching the chat.
    ///
    /// The whole transcript, pending message included, is the history; the
    /// pending text then follows once more as the region-tagged final turn.
    async fn fetch_reply(&self) -> Result<String> {
        let chat = self
            .current()
            .ok_or_else(|| Error::validation("there is no current chat", None))?;
        let pending = chat
            .last_message()
            .filter(|message| message.is_user())
            .ok_or_else(|| Error::validation("no message is waiting for a reply", None))?;
        self.client
            .complete(
                &chat.messages,
                &pending.content,
                self.context.region.as_ref(),
                &self.model,
            )
            .await
            .inspect_err(|err| warn!(error = %err, "completion failed, message left pending"))
    }

    /// Submits `text` and renders the reply, or the failure notice.
    ///
    /// Failures are rendered under the same rules as [`Self::respond_rendered`].
    pub async fn converse(&mut self, text: &str, renderer: &mut dyn Renderer) -> Result<()> {
        if let Err(err) = self.submit(text) {
            if err.is_storage() {
                renderer.print_error(&err.to_string());
            }
            return Err(err);
        }
        if let Some(message) = self.current().and_then(ChatSession::last_message) {
            renderer.print_message(message);
        }
        self.respond_rendered(renderer).await
    }

    /// Fetches the reply behind the loading indicator, renders it, then
    /// appends it to the chat.
    ///
    /// Upstream, connectivity, and storage failures are rendered before they
    /// are returned. If the reply cannot be saved it is still shown, and the
    /// chat stays pending in memory and on disk.
    pub async fn respond_rendered(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        renderer.start_pending(LOADING_TEXT);
        let outcome = self.fetch_reply().await;
        renderer.finish_pending();
        match outcome {
            Ok(text) => {
                let reply = Message::assistant(text);
                renderer.print_message(&reply);
                if let Err(err) = self.sessions.append_message(reply) {
                    renderer.print_error(&err.to_string());
                    return Err(err);
                }
                Ok(())
            }
            Err(err) if err.is_upstream() || err.is_connectivity() => {
                renderer.print_error(&err.to_string());
                renderer.print_error(FAILURE_NOTICE);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Returns true if [`Self::converse`] and [`Self::respond_rendered`] have
    /// already shown `err` to the user.
    pub fn renders_failure(err: &Error) -> bool {
        err.is_upstream() || err.is_connectivity() || err.is_storage()
    }
}
