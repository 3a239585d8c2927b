//! Knowledge item model and the helpers used by the knowledge base endpoints.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::keywords::{tokenize, ITEM_STOP_WORDS, MAX_ITEM_KEYWORDS};
use crate::types::{ItemId, Timestamp};

/// Category assigned when a new item does not specify one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Wildcard category filter value.
pub const ALL_CATEGORIES: &str = "all";

/// A single support snippet in the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: ItemId,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub created_at: Timestamp,
}

impl KnowledgeItem {
    /// Build a new item from user-supplied content.
    ///
    /// Content is trimmed and must not be empty. Keywords are extracted from
    /// the trimmed content.
    pub fn new(content: &str, category: Option<&str>) -> Result<Self, CoreError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(CoreError::Validation("content must not be empty".into()));
        }

        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        Ok(Self {
            id: uuid::Uuid::now_v7().to_string(),
            content: content.to_string(),
            category: category.to_string(),
            keywords: extract_item_keywords(content),
            created_at: chrono::Utc::now(),
        })
    }

    /// Short prefix of the content for log lines.
    pub fn excerpt(&self) -> String {
        self.content.chars().take(50).collect()
    }
}

/// Extract at most [`MAX_ITEM_KEYWORDS`] keywords from item content.
pub fn extract_item_keywords(content: &str) -> Vec<String> {
    let mut keywords = tokenize(content, ITEM_STOP_WORDS);
    keywords.truncate(MAX_ITEM_KEYWORDS);
    keywords
}

/// Whether `item` matches a free-text search term.
///
/// The term is matched case-insensitively as a substring of the content,
/// the category, or any keyword.
pub fn matches_search_term(item: &KnowledgeItem, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }

    item.content.to_lowercase().contains(&term)
        || item.category.to_lowercase().contains(&term)
        || item
            .keywords
            .iter()
            .any(|k| k.to_lowercase().contains(&term))
}

/// Whether `category` selects every item (`None` or `"all"`).
pub fn is_wildcard_category(category: Option<&str>) -> bool {
    matches!(category, None | Some(ALL_CATEGORIES))
}

/// Keep only the items in `category`; `None` and `"all"` keep everything.
pub fn filter_by_category(items: Vec<KnowledgeItem>, category: Option<&str>) -> Vec<KnowledgeItem> {
    if is_wildcard_category(category) {
        return items;
    }
    items
        .into_iter()
        .filter(|i| Some(i.category.as_str()) == category)
        .collect()
}

/// Distinct categories in first-seen order.
pub fn distinct_categories(items: &[KnowledgeItem]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.iter().any(|c| c == &item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}

/// The starter knowledge base written when no store exists yet.
pub fn seed_items() -> Vec<KnowledgeItem> {
    let now = chrono::Utc::now();
    let entry = |id: &str, content: &str, category: &str, keywords: &[&str]| KnowledgeItem {
        id: id.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        created_at: now,
    };

    vec![
        entry(
            "product-001",
            "我们的旗舰产品是一款智能客服系统，支持多语言对话、情感分析和知识库管理。",
            "product",
            &["产品", "智能客服", "多语言", "情感分析", "知识库"],
        ),
        entry(
            "service-001",
            "我们提供7x24小时专业技术支持，响应时间不超过2小时，支持电话、邮件和在线聊天。",
            "service",
            &["技术支持", "7x24", "响应时间", "电话", "邮件", "在线聊天"],
        ),
        entry(
            "policy-001",
            "产品保修期为12个月，在保修期内提供免费维修和更换服务，不包括人为损坏。",
            "policy",
            &["保修期", "12个月", "免费维修", "更换", "人为损坏"],
        ),
        entry(
            "technical-001",
            "系统支持API集成，提供RESTful接口，支持Webhook回调，文档可在开发者中心查看。",
            "technical",
            &["API", "集成", "RESTful", "Webhook", "回调", "文档", "开发者中心"],
        ),
        entry(
            "faq-001",
            "常见问题：如何重置密码？请访问登录页面，点击\"忘记密码\"，输入邮箱地址即可收到重置链接。",
            "faq",
            &["重置密码", "忘记密码", "邮箱", "重置链接"],
        ),
    ]
}
