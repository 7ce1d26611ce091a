// Public modules
pub mod chat_completion;
pub mod chat_session;
pub mod message;
pub mod model;
pub mod region;
pub mod session_document;

// Re-exports
pub use chat_completion::{
    ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceMessage, CompletionUsage,
    FREQUENCY_PENALTY, MAX_TOKENS, PRESENCE_PENALTY, TEMPERATURE,
};
pub use chat_session::{ChatSession, DEFAULT_TITLE, GREETING, TITLE_MAX_CHARS, derive_title};
pub use message::{Message, Role};
pub use model::{KnownModel, Model};
pub use region::{KnownRegion, Region};
pub use session_document::SessionDocument;
