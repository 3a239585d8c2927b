use std::sync::Arc;

use ragdesk_db::KnowledgeStore;
use ragdesk_llm::ChatCompletionsApi;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Knowledge base backend (JSON file or PostgreSQL).
    pub store: Arc<dyn KnowledgeStore>,
    /// Chat-completions client.
    pub llm: Arc<ChatCompletionsApi>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
