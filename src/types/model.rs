use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents an OpenRouter model identifier.
///
/// This can be a predefined model or a custom string value for any other
/// model the endpoint routes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model identifiers
    Known(KnownModel),

    /// Custom model identifier
    Custom(String),
}

/// Known OpenRouter model identifiers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Llama 3.3 70B Instruct, free tier. The default.
    #[serde(rename = "meta-llama/llama-3.3-70b-instruct:free")]
    Llama33_70bInstructFree,

    /// Llama 3.3 70B Instruct, paid tier.
    #[serde(rename = "meta-llama/llama-3.3-70b-instruct")]
    Llama33_70bInstruct,
}

impl KnownModel {
    /// Every known model, in display order.
    pub const ALL: [KnownModel; 2] = [
        KnownModel::Llama33_70bInstructFree,
        KnownModel::Llama33_70bInstruct,
    ];

    /// The identifier sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Llama33_70bInstructFree => "meta-llama/llama-3.3-70b-instruct:free",
            KnownModel::Llama33_70bInstruct => "meta-llama/llama-3.3-70b-instruct",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::Llama33_70bInstructFree)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    /// Parses a model identifier, recognizing known models and keeping
    /// anything else as [`Model::Custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(KnownModel::ALL
            .iter()
            .find(|known| known.as_str() == s)
            .map(|known| Model::Known(*known))
            .unwrap_or_else(|| Model::Custom(s.to_string())))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::Custom(model.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_serialization() {
        let model = Model::default();
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""meta-llama/llama-3.3-70b-instruct:free""#);
    }

    #[test]
    fn custom_model_serialization() {
        let model = Model::Custom("openai/gpt-4o-mini".to_string());
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""openai/gpt-4o-mini""#);
    }

    #[test]
    fn model_deserialization() {
        let json = r#""meta-llama/llama-3.3-70b-instruct""#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model, Model::Known(KnownModel::Llama33_70bInstruct));

        let json = r#""mistralai/mistral-7b-instruct""#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(
            model,
            Model::Custom("mistralai/mistral-7b-instruct".to_string())
        );
    }

    #[test]
    fn parse_and_display() {
        let model: Model = "meta-llama/llama-3.3-70b-instruct:free".parse().unwrap();
        assert_eq!(model, Model::default());
        assert_eq!(model.to_string(), "meta-llama/llama-3.3-70b-instruct:free");

        let model: Model = " google/gemma-2-9b-it ".parse().unwrap();
        assert_eq!(model.to_string(), "google/gemma-2-9b-it");
    }
}
