//! Knowledge item row struct and request DTOs.

use ragdesk_core::knowledge::KnowledgeItem;
use ragdesk_core::types::{ItemId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

// ---------------------------------------------------------------------------
// Entity struct (database row)
// ---------------------------------------------------------------------------

/// A row from the `knowledge_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct KnowledgeItemRow {
    pub id: ItemId,
    pub content: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub created_at: Timestamp,
}

impl From<KnowledgeItemRow> for KnowledgeItem {
    fn from(row: KnowledgeItemRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            category: row.category,
            keywords: row.keywords,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for adding a knowledge item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateKnowledgeItem {
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    pub category: Option<String>,
}

/// Query parameters for `GET /api/knowledge`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeListParams {
    pub category: Option<String>,
}

/// Query parameters for `GET /api/knowledge/search`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KnowledgeSearchParams {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub q: String,
}

/// Reject strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_fails_validation() {
        let dto = CreateKnowledgeItem {
            content: "   ".into(),
            category: None,
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("content"));
    }

    #[test]
    fn non_blank_search_term_passes() {
        let params = KnowledgeSearchParams { q: "保修".into() };
        assert!(params.validate().is_ok());
    }
}
