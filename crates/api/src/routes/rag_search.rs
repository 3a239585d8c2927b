use axum::routing::post;
use axum::Router;

use crate::handlers::rag_search;
use crate::state::AppState;

/// `POST /rag-search`.
pub fn router() -> Router<AppState> {
    Router::new().route("/rag-search", post(rag_search::rag_search))
}
