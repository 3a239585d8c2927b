//! Route definitions for knowledge base management.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::knowledge;
use crate::state::AppState;

/// Knowledge routes mounted at `/knowledge`.
///
/// ```text
/// GET    /          -> list_knowledge
/// POST   /          -> create_knowledge
/// GET    /search    -> search_knowledge
/// DELETE /{id}      -> delete_knowledge
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(knowledge::list_knowledge).post(knowledge::create_knowledge),
        )
        .route("/search", get(knowledge::search_knowledge))
        .route("/{id}", delete(knowledge::delete_knowledge))
}
