//! REST client for the chat-completions endpoint.
//!
//! Wraps `POST {base}/chat/completions` with bearer authentication using
//! [`reqwest`].

use crate::messages::{ChatRequest, ChatResponse};

/// HTTP client for a chat-completions API.
#[derive(Clone)]
pub struct ChatCompletionsApi {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

/// Errors from the chat-completions API layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("LLM API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `error.message` from the JSON body, or the raw body.
        message: String,
    },

    /// No API key is configured, so no request was attempted.
    #[error("LLM API key is not configured")]
    MissingApiKey,
}

impl ChatCompletionsApi {
    /// Create a client for the API at `api_url` (without the
    /// `/chat/completions` suffix).
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send a non-streaming completion request.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        tracing::debug!(status = response.status().as_u16(), model = %request.model, "LLM API responded");

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<ChatResponse>().await?)
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an [`LlmError::Api`]
    /// carrying the upstream error message on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(LlmError::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
