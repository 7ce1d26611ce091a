//! Interactive chat application built on the session store and the
//! completion client.
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`manager`]: session lifecycle with persistence after every mutation
//! - [`state`]: the `Idle`/`PendingResponse` state and per-interaction context
//! - [`session`]: the application driver that routes user actions
//! - [`commands`]: slash command parsing

mod commands;
mod config;
mod manager;
mod session;
mod state;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use manager::SessionManager;
pub use session::{
    AppStatus, ChatApp, FAILURE_NOTICE, LOADING_TEXT, MISSING_KEY_NOTICE, SUGGESTIONS,
};
pub use state::{ChatState, InteractionContext};
