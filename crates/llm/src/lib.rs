//! Client for OpenAI-style chat-completions APIs (DeepSeek by default).

pub mod api;
pub mod messages;

pub use api::{ChatCompletionsApi, LlmError};
pub use messages::{ChatMessage, ChatRequest, ChatResponse};

/// Model used when a request does not name one.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default API base URL; requests go to `{base}/chat/completions`.
pub const DEFAULT_API_URL: &str = "https://api.deepseek.com";
