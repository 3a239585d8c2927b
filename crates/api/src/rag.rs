//! Retrieval against the live knowledge store, shared by the search and chat
//! handlers.

use chrono::Utc;
use ragdesk_core::retrieval::{
    build_context, confidence_level, confidence_score, relevance_reason, retrieve,
    ConfidenceLevel, ProcessedQuery, RetrievalOptions, ScoredItem,
};
use ragdesk_core::types::{ItemId, Timestamp};
use ragdesk_db::{KnowledgeStore, StoreError};
use serde::Serialize;

/// Label reported in search metadata for the scoring strategy.
pub const SEARCH_STRATEGY: &str = "keyword_similarity";

/// Result of a retrieval pass, before it is shaped for a response.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub query: ProcessedQuery,
    pub hits: Vec<ScoredItem>,
}

impl Retrieval {
    pub fn confidence_score(&self) -> f64 {
        let similarities: Vec<f64> = self.hits.iter().map(|h| h.similarity).collect();
        confidence_score(&similarities)
    }
}

/// Score the whole store against `query` and keep the best hits.
pub async fn run(
    store: &dyn KnowledgeStore,
    query: &str,
    options: &RetrievalOptions,
) -> Result<Retrieval, StoreError> {
    let items = store.all().await?;
    let query = ProcessedQuery::new(query);
    let hits = retrieve(&query, &items, options);

    tracing::debug!(
        candidates = items.len(),
        hits = hits.len(),
        intent = query.intent.as_str(),
        context_type = %options.context_type,
        "Retrieval complete",
    );

    Ok(Retrieval { query, hits })
}

// ---------------------------------------------------------------------------
// Search response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: ItemId,
    pub content: String,
    pub category: String,
    pub similarity_score: f64,
    pub relevance_reason: String,
    pub metadata: SearchHitMetadata,
}

#[derive(Debug, Serialize)]
pub struct SearchHitMetadata {
    pub created_at: Timestamp,
    pub confidence_level: ConfidenceLevel,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub context_type: String,
    pub results: Vec<SearchHit>,
    pub total_found: usize,
    pub confidence_score: f64,
    pub retrieval_metadata: RetrievalMetadata,
}

#[derive(Debug, Serialize)]
pub struct RetrievalMetadata {
    pub search_strategy: &'static str,
    pub max_results: usize,
    pub similarity_threshold: f64,
    pub timestamp: Timestamp,
}

impl SearchResponse {
    pub fn from_retrieval(retrieval: Retrieval, options: &RetrievalOptions) -> Self {
        let confidence_score = retrieval.confidence_score();
        let query = retrieval.query;

        let results: Vec<SearchHit> = retrieval
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                relevance_reason: relevance_reason(&hit.item.content, &query),
                metadata: SearchHitMetadata {
                    created_at: hit.item.created_at,
                    confidence_level: confidence_level(hit.similarity),
                },
                id: hit.item.id,
                content: hit.item.content,
                category: hit.item.category,
                similarity_score: hit.similarity,
            })
            .collect();

        Self {
            query: query.original,
            context_type: options.context_type.clone(),
            total_found: results.len(),
            results,
            confidence_score,
            retrieval_metadata: RetrievalMetadata {
                search_strategy: SEARCH_STRATEGY,
                max_results: options.max_results,
                similarity_threshold: options.threshold,
                timestamp: Utc::now(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Chat context shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ContextHit {
    pub id: ItemId,
    pub content: String,
    pub category: String,
    pub similarity_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextMetadata {
    pub total_found: usize,
    pub confidence_score: f64,
    pub results: Vec<ContextHit>,
}

/// Prompt context produced for a chat message.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// Rendered context block; empty when nothing matched.
    pub text: String,
    /// Hit details; `None` when nothing matched.
    pub metadata: Option<ContextMetadata>,
}

impl ChatContext {
    pub fn from_retrieval(retrieval: &Retrieval) -> Self {
        if retrieval.hits.is_empty() {
            return Self::default();
        }

        Self {
            text: build_context(&retrieval.hits),
            metadata: Some(ContextMetadata {
                total_found: retrieval.hits.len(),
                confidence_score: retrieval.confidence_score(),
                results: retrieval
                    .hits
                    .iter()
                    .map(|hit| ContextHit {
                        id: hit.item.id.clone(),
                        content: hit.item.content.clone(),
                        category: hit.item.category.clone(),
                        similarity_score: hit.similarity,
                    })
                    .collect(),
            }),
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        self.metadata.as_ref().map(|m| m.confidence_score)
    }
}
