//! Handler for standalone knowledge retrieval.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ragdesk_core::knowledge::ALL_CATEGORIES;
use ragdesk_core::retrieval::{
    RetrievalOptions, DEFAULT_SEARCH_RESULTS, DEFAULT_SIMILARITY_THRESHOLD,
};
use ragdesk_db::models::knowledge_item::not_blank;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::rag::{self, SearchResponse};
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on `max_results`.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Body of `POST /api/rag-search`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RagSearchRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub query: String,
    /// Category to restrict results to (default `all`).
    pub context_type: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub max_results: Option<usize>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub similarity_threshold: Option<f64>,
}

impl RagSearchRequest {
    pub fn options(&self) -> RetrievalOptions {
        RetrievalOptions {
            context_type: self
                .context_type
                .clone()
                .unwrap_or_else(|| ALL_CATEGORIES.to_string()),
            max_results: self
                .max_results
                .unwrap_or(DEFAULT_SEARCH_RESULTS)
                .min(MAX_SEARCH_RESULTS),
            threshold: self
                .similarity_threshold
                .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
        }
    }
}

/// POST /api/rag-search
///
/// Score the knowledge base against `query` and return the best hits with
/// per-hit relevance reasons and an overall confidence score.
pub async fn rag_search(
    State(state): State<AppState>,
    Json(input): Json<RagSearchRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let options = input.options();
    let retrieval = rag::run(state.store.as_ref(), &input.query, &options).await?;

    tracing::info!(
        query = %input.query,
        context_type = %options.context_type,
        hits = retrieval.hits.len(),
        "RAG search complete",
    );

    Ok(Json(DataResponse {
        data: SearchResponse::from_retrieval(retrieval, &options),
    }))
}
