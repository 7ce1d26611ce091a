//! Teman Wisata: a chat companion for Indonesian travel and culture.
//!
//! The crate keeps any number of named chat sessions in a local JSON file
//! and answers questions through an OpenRouter-compatible chat-completion
//! endpoint.

// Public modules
pub mod chat;
pub mod client;
pub mod completion;
pub mod error;
pub mod observability;
pub mod render;
pub mod store;
pub mod types;
pub mod utils;

// Re-exports
pub use client::OpenRouter;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use store::{CredentialStore, SessionStore};
pub use types::*;
