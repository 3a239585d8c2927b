//! Wire types for the chat-completions endpoint.

use serde::{Deserialize, Serialize};

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`. Streaming is never requested.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Sampling settings for conversational answers.
    pub const CHAT_TEMPERATURE: f32 = 0.7;
    pub const CHAT_MAX_TOKENS: u32 = 1500;

    /// Sampling settings for analytical tasks.
    pub const ANALYSIS_TEMPERATURE: f32 = 0.3;
    pub const ANALYSIS_MAX_TOKENS: u32 = 2000;

    /// A system + user exchange with chat sampling settings.
    pub fn chat(model: &str, system: &str, user: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            stream: false,
            temperature: Self::CHAT_TEMPERATURE,
            max_tokens: Self::CHAT_MAX_TOKENS,
        }
    }

    /// A system + user exchange with analysis sampling settings.
    pub fn analysis(model: &str, system: &str, user: &str) -> Self {
        Self {
            temperature: Self::ANALYSIS_TEMPERATURE,
            max_tokens: Self::ANALYSIS_MAX_TOKENS,
            ..Self::chat(model, system, user)
        }
    }
}

/// Response from `POST /chat/completions`. Only the fields we use are typed;
/// `usage` is passed through to clients verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if any non-empty content was returned.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|c| !c.is_empty())
    }
}
