//! The [`KnowledgeStore`] abstraction and its backends.

mod file;
mod postgres;

pub use file::FileKnowledgeStore;
pub use postgres::PgKnowledgeStore;

use async_trait::async_trait;
use ragdesk_core::knowledge::{filter_by_category, matches_search_term, KnowledgeItem};

use crate::error::StoreError;

/// Storage for knowledge items.
///
/// Implementations preserve insertion order: `all` and `list` return items in
/// the order they were added, which the retrieval scorer relies on to break
/// ties deterministically.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Every item, in insertion order.
    async fn all(&self) -> Result<Vec<KnowledgeItem>, StoreError>;

    /// Items in `category`; `None` and `"all"` return everything.
    async fn list(&self, category: Option<&str>) -> Result<Vec<KnowledgeItem>, StoreError> {
        Ok(filter_by_category(self.all().await?, category))
    }

    /// Items matching a free-text search term.
    async fn search(&self, term: &str) -> Result<Vec<KnowledgeItem>, StoreError> {
        let items = self.all().await?;
        Ok(items
            .into_iter()
            .filter(|item| matches_search_term(item, term))
            .collect())
    }

    /// Append a new item.
    async fn insert(&self, item: KnowledgeItem) -> Result<(), StoreError>;

    /// Remove an item by id, returning it if it existed.
    async fn delete(&self, id: &str) -> Result<Option<KnowledgeItem>, StoreError>;

    /// Number of stored items.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Check the backend is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}
