//! Local persistence for the API key and the session document.
//!
//! Reads never fail: a missing, unreadable, or corrupt file degrades to an
//! empty default. Writes always propagate their errors.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::observability::{SESSIONS_CREATED, STORE_LOAD_FALLBACKS, STORE_SAVES};
use crate::types::SessionDocument;

/// Default location of the API key file.
pub const DEFAULT_KEY_FILE: &str = "api_key.txt";

/// Default location of the session document.
pub const DEFAULT_HISTORY_FILE: &str = "chat_history.json";

/// Plain-text storage for a single secret.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved secret, or an empty string if there is none.
    pub fn load(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents.trim().to_string(),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "no saved api key");
                String::new()
            }
        }
    }

    /// Overwrites the saved secret.
    pub fn save(&self, secret: &str) -> Result<()> {
        fs::write(&self.path, secret).map_err(|err| {
            Error::io(
                format!("failed to write api key to {}", self.path.display()),
                err,
            )
        })?;
        STORE_SAVES.click();
        debug!(path = %self.path.display(), "saved api key");
        Ok(())
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_FILE)
    }
}

/// JSON storage for the full [`SessionDocument`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, substituting an empty one on any failure.
    pub fn load(&self) -> SessionDocument {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "no session history");
                STORE_LOAD_FALLBACKS.click();
                return SessionDocument::empty();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "corrupt session history, starting fresh");
                STORE_LOAD_FALLBACKS.click();
                SessionDocument::empty()
            }
        }
    }

    /// Serializes the document and replaces the file in one rename.
    ///
    /// Readers see either the previous document or this one, never a prefix.
    pub fn save(&self, doc: &SessionDocument) -> Result<()> {
        let payload = serde_json::to_vec(doc).map_err(|err| {
            Error::serialization("failed to serialize session history", Some(Box::new(err)))
        })?;
        let tmp = self.temp_path();
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&payload)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        if let Err(err) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(Error::io(
                format!("failed to write session history to {}", self.path.display()),
                err,
            ));
        }
        STORE_SAVES.click();
        debug!(
            path = %self.path.display(),
            conversations = doc.conversations.len(),
            "saved session history"
        );
        Ok(())
    }

    /// Loads the document and guarantees it holds at least one session.
    ///
    /// A freshly created session is persisted before returning.
    pub fn initialize(&self) -> Result<SessionDocument> {
        let mut doc = self.load();
        if doc.ensure_session() {
            SESSIONS_CREATED.click();
            info!(path = %self.path.display(), "created first chat session");
            self.save(&doc)?;
        }
        Ok(doc)
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FILE)
    }
}
