pub mod analysis;
pub mod chat;
pub mod health;
pub mod knowledge;
pub mod rag_search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /knowledge                 list (GET), add (POST)
/// /knowledge/search          substring search (GET ?q=)
/// /knowledge/{id}            delete (DELETE)
///
/// /rag-search                scored retrieval (POST)
/// /chat                      retrieval-augmented chat (POST)
/// /text-analysis             LLM text analysis (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/knowledge", knowledge::router())
        .merge(rag_search::router())
        .merge(chat::router())
        .merge(analysis::router())
}
