use serde::{Deserialize, Serialize};

use crate::types::{Message, Model, Role};

/// Output token budget for every completion.
pub const MAX_TOKENS: u32 = 1500;

/// Sampling temperature for every completion.
pub const TEMPERATURE: f32 = 0.8;

/// Presence penalty for every completion.
pub const PRESENCE_PENALTY: f32 = 0.3;

/// Frequency penalty for every completion.
pub const FREQUENCY_PENALTY: f32 = 0.2;

/// Body of a chat-completion request.
///
/// The generation parameters are fixed; only the model and messages vary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// The model that will complete the conversation.
    pub model: Model,

    /// System prompt, context window, and the new user turn.
    pub messages: Vec<Message>,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Amount of randomness injected into the response.
    pub temperature: f32,

    /// Penalty for tokens that already appeared at all.
    pub presence_penalty: f32,

    /// Penalty proportional to how often a token already appeared.
    pub frequency_penalty: f32,
}

impl ChatCompletionRequest {
    /// Create a request with the fixed generation parameters.
    pub fn new(model: Model, messages: Vec<Message>) -> Self {
        Self {
            model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            presence_penalty: PRESENCE_PENALTY,
            frequency_penalty: FREQUENCY_PENALTY,
        }
    }
}

/// Body of a successful chat-completion response.
///
/// Everything is optional so that a payload missing the reply can be
/// reported as malformed instead of failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// Identifier assigned by the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The model that actually served the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Completion choices. Only the first is used.
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token accounting, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<CompletionUsage>,
}

impl ChatCompletionResponse {
    /// Returns the text of the first choice, if present.
    pub fn reply_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
    }
}

/// One completion choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// Position of this choice.
    #[serde(default)]
    pub index: u32,

    /// The generated message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChoiceMessage>,

    /// Why generation stopped, e.g. `stop` or `length`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The message inside a completion choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// Role of the author; normally assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Reply text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Token accounting for one completion.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionUsage {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,

    /// Tokens in the completion.
    #[serde(default)]
    pub completion_tokens: u64,

    /// Sum of both.
    #[serde(default)]
    pub total_tokens: u64,
}
