//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_API_URL;
use crate::store::{DEFAULT_HISTORY_FILE, DEFAULT_KEY_FILE};
use crate::types::Model;

/// Command-line arguments for the teman-wisata tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(
        optional,
        "Model to use (default: meta-llama/llama-3.3-70b-instruct:free)",
        "MODEL"
    )]
    pub model: Option<String>,

    /// Root of the chat-completion API.
    #[arrrg(optional, "API root (default: https://openrouter.ai/api/v1/)", "URL")]
    pub base_url: Option<String>,

    /// Where chat sessions are persisted.
    #[arrrg(optional, "Chat history file (default: chat_history.json)", "FILE")]
    pub history_file: Option<String>,

    /// Where the API key is persisted.
    #[arrrg(optional, "API key file (default: api_key.txt)", "FILE")]
    pub key_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Resolved configuration for a chat application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Root of the chat-completion API.
    pub base_url: String,

    /// Path of the session document.
    pub history_file: PathBuf,

    /// Path of the API key file.
    pub key_file: PathBuf,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: meta-llama/llama-3.3-70b-instruct:free
    /// - API root: https://openrouter.ai/api/v1/
    /// - Files: chat_history.json and api_key.txt in the working directory
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            base_url: DEFAULT_API_URL.to_string(),
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            use_color: true,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the session document path.
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = path.into();
        self
    }

    /// Sets the API key file path.
    pub fn with_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_file = path.into();
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let defaults = ChatConfig::new();
        ChatConfig {
            model: args
                .model
                .and_then(|s| s.parse::<Model>().ok())
                .unwrap_or(defaults.model),
            base_url: args.base_url.unwrap_or(defaults.base_url),
            history_file: args
                .history_file
                .map(PathBuf::from)
                .unwrap_or(defaults.history_file),
            key_file: args.key_file.map(PathBuf::from).unwrap_or(defaults.key_file),
            use_color: !args.no_color,
        }
    }
}
