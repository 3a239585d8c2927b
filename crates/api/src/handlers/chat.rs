//! Handler for the retrieval-augmented support chat.
//!
//! Flow: retrieve context from the knowledge base, build the system prompt,
//! call the chat-completions API, then run the consistency check on the
//! answer.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ragdesk_core::consistency::{check_answer, ConsistencyCheck};
use ragdesk_core::knowledge::ALL_CATEGORIES;
use ragdesk_core::prompt::build_system_prompt;
use ragdesk_core::retrieval::RetrievalOptions;
use ragdesk_core::types::Timestamp;
use ragdesk_db::models::knowledge_item::not_blank;
use ragdesk_llm::ChatRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::rag::{self, ChatContext, ContextMetadata};
use crate::response::DataResponse;
use crate::state::AppState;

/// Reply used when the model returns no content.
pub const FALLBACK_REPLY: &str = "抱歉，我无法生成回复。";

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatBody {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub message: String,
    /// Model name; defaults to the configured model.
    pub model: Option<String>,
    /// Whether to inject knowledge base context (default `true`).
    #[serde(default = "default_use_rag")]
    pub use_rag: bool,
    /// Category to draw context from (default `all`).
    pub context_type: Option<String>,
}

fn default_use_rag() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub response: String,
    pub model: String,
    pub use_rag: bool,
    pub rag_context: String,
    pub rag_metadata: Option<ContextMetadata>,
    pub consistency_check: ConsistencyCheck,
    pub usage: Option<serde_json::Value>,
    pub timestamp: Timestamp,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(input): Json<ChatBody>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let model = input
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.config.llm.default_model.clone());

    let context = if input.use_rag {
        let context_type = input.context_type.as_deref().unwrap_or(ALL_CATEGORIES);
        retrieve_context(&state, &input.message, context_type).await
    } else {
        ChatContext::default()
    };

    tracing::info!(
        model = %model,
        use_rag = input.use_rag,
        context_hits = context.metadata.as_ref().map_or(0, |m| m.total_found),
        "Handling chat message",
    );

    let system_prompt = build_system_prompt(&context.text, context.confidence());
    let request = ChatRequest::chat(&model, &system_prompt, &input.message);
    let completion = state.llm.complete(&request).await?;

    let answer = completion
        .first_content()
        .unwrap_or(FALLBACK_REPLY)
        .to_string();
    let consistency_check = check_answer(&answer, &context.text);

    if !consistency_check.passed {
        tracing::warn!(issues = ?consistency_check.issues, "Chat answer failed consistency check");
    }

    Ok(Json(DataResponse {
        data: ChatReply {
            message: input.message,
            response: answer,
            model,
            use_rag: input.use_rag,
            rag_context: context.text,
            rag_metadata: context.metadata,
            consistency_check,
            usage: completion.usage,
            timestamp: chrono::Utc::now(),
        },
    }))
}

/// Retrieve prompt context, degrading to no context if the store fails.
async fn retrieve_context(state: &AppState, message: &str, context_type: &str) -> ChatContext {
    let options = RetrievalOptions::for_chat(context_type);
    match rag::run(state.store.as_ref(), message, &options).await {
        Ok(retrieval) => ChatContext::from_retrieval(&retrieval),
        Err(e) => {
            tracing::error!(error = %e, "Retrieval failed, answering without context");
            ChatContext::default()
        }
    }
}
