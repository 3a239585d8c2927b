//! Repository for the `knowledge_items` table.

use ragdesk_core::knowledge::KnowledgeItem;
use sqlx::PgPool;

use crate::models::knowledge_item::KnowledgeItemRow;

/// Column list for `knowledge_items` queries.
const COLUMNS: &str = "id, content, category, keywords, created_at";

/// Provides CRUD operations for knowledge items.
pub struct KnowledgeRepo;

impl KnowledgeRepo {
    /// List items in insertion order, optionally restricted to one category.
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<KnowledgeItemRow>, sqlx::Error> {
        match category {
            Some(category) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM knowledge_items WHERE category = $1 ORDER BY seq"
                );
                sqlx::query_as::<_, KnowledgeItemRow>(&query)
                    .bind(category)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM knowledge_items ORDER BY seq");
                sqlx::query_as::<_, KnowledgeItemRow>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Insert a fully-formed item.
    pub async fn create(pool: &PgPool, item: &KnowledgeItem) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO knowledge_items (id, content, category, keywords, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&item.id)
        .bind(&item.content)
        .bind(&item.category)
        .bind(&item.keywords)
        .bind(item.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete an item, returning the removed row if it existed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<Option<KnowledgeItemRow>, sqlx::Error> {
        let query = format!("DELETE FROM knowledge_items WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, KnowledgeItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of items.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM knowledge_items")
            .fetch_one(pool)
            .await
    }

    /// Insert `items` in a single transaction if the table is empty.
    ///
    /// Returns the number of rows inserted.
    pub async fn seed_if_empty(pool: &PgPool, items: &[KnowledgeItem]) -> Result<usize, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM knowledge_items")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        for item in items {
            sqlx::query(
                "INSERT INTO knowledge_items (id, content, category, keywords, created_at) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&item.id)
            .bind(&item.content)
            .bind(&item.category)
            .bind(&item.keywords)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(items.len())
    }
}
