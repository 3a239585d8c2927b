use async_trait::async_trait;
use ragdesk_core::knowledge::{is_wildcard_category, seed_items, KnowledgeItem};

use super::KnowledgeStore;
use crate::error::StoreError;
use crate::repositories::KnowledgeRepo;
use crate::DbPool;

/// Knowledge store backed by the `knowledge_items` table.
#[derive(Clone)]
pub struct PgKnowledgeStore {
    pool: DbPool,
}

impl PgKnowledgeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connect, migrate, and seed an empty table.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = crate::create_pool(database_url).await?;
        tracing::info!("Database connection pool created");

        crate::health_check(&pool).await?;
        crate::run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");

        let seeded = KnowledgeRepo::seed_if_empty(&pool, &seed_items()).await?;
        if seeded > 0 {
            tracing::info!(count = seeded, "Seeded knowledge_items table");
        }

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl KnowledgeStore for PgKnowledgeStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn all(&self) -> Result<Vec<KnowledgeItem>, StoreError> {
        let rows = KnowledgeRepo::list(&self.pool, None).await?;
        Ok(rows.into_iter().map(KnowledgeItem::from).collect())
    }

    async fn list(&self, category: Option<&str>) -> Result<Vec<KnowledgeItem>, StoreError> {
        let category = category.filter(|c| !is_wildcard_category(Some(*c)));
        let rows = KnowledgeRepo::list(&self.pool, category).await?;
        Ok(rows.into_iter().map(KnowledgeItem::from).collect())
    }

    async fn insert(&self, item: KnowledgeItem) -> Result<(), StoreError> {
        KnowledgeRepo::create(&self.pool, &item).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<Option<KnowledgeItem>, StoreError> {
        let row = KnowledgeRepo::delete(&self.pool, id).await?;
        Ok(row.map(KnowledgeItem::from))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count = KnowledgeRepo::count(&self.pool).await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
