//! Handlers for knowledge base management.
//!
//! Provides list (with category filter), add, delete and substring search
//! over the configured [`KnowledgeStore`](ragdesk_db::KnowledgeStore).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ragdesk_core::error::CoreError;
use ragdesk_core::knowledge::{distinct_categories, KnowledgeItem};
use ragdesk_db::models::knowledge_item::{
    CreateKnowledgeItem, KnowledgeListParams, KnowledgeSearchParams,
};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KnowledgeList {
    pub items: Vec<KnowledgeItem>,
    pub total: usize,
    /// Every category present in the store, regardless of the filter.
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeCreated {
    pub item: KnowledgeItem,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeDeleted {
    pub deleted_item: KnowledgeItem,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeSearchResults {
    pub query: String,
    pub results: Vec<KnowledgeItem>,
    pub total: usize,
}

/// GET /api/knowledge
///
/// List items, optionally filtered by `?category=` (`all` means no filter).
pub async fn list_knowledge(
    State(state): State<AppState>,
    Query(params): Query<KnowledgeListParams>,
) -> AppResult<impl IntoResponse> {
    let items = state.store.list(params.category.as_deref()).await?;
    let categories = distinct_categories(&state.store.all().await?);

    tracing::debug!(
        category = params.category.as_deref().unwrap_or("all"),
        count = items.len(),
        "Listed knowledge items",
    );

    Ok(Json(DataResponse {
        data: KnowledgeList {
            total: items.len(),
            items,
            categories,
        },
    }))
}

/// POST /api/knowledge
///
/// Add an item. Content is trimmed and keywords are extracted automatically.
pub async fn create_knowledge(
    State(state): State<AppState>,
    Json(input): Json<CreateKnowledgeItem>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let item = KnowledgeItem::new(&input.content, input.category.as_deref())?;
    state.store.insert(item.clone()).await?;
    let total = state.store.count().await?;

    tracing::info!(
        id = %item.id,
        category = %item.category,
        excerpt = %item.excerpt(),
        total,
        "Knowledge item added",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: KnowledgeCreated { item, total },
        }),
    ))
}

/// DELETE /api/knowledge/{id}
pub async fn delete_knowledge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted_item = state
        .store
        .delete(&id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "KnowledgeItem",
                id: id.clone(),
            })
        })?;
    let total = state.store.count().await?;

    tracing::info!(
        id = %deleted_item.id,
        category = %deleted_item.category,
        total,
        "Knowledge item deleted",
    );

    Ok(Json(DataResponse {
        data: KnowledgeDeleted {
            deleted_item,
            total,
        },
    }))
}

/// GET /api/knowledge/search?q=
///
/// Case-insensitive substring match over content, category and keywords.
pub async fn search_knowledge(
    State(state): State<AppState>,
    Query(params): Query<KnowledgeSearchParams>,
) -> AppResult<impl IntoResponse> {
    params.validate()?;

    let results = state.store.search(&params.q).await?;

    Ok(Json(DataResponse {
        data: KnowledgeSearchResults {
            query: params.q,
            total: results.len(),
            results,
        },
    }))
}
