//! Keyword/substring retrieval scorer for the knowledge base.
//!
//! Scoring is a weighted sum of four signals, capped at `1.0`:
//!
//! | signal                                                   | weight      |
//! |----------------------------------------------------------|-------------|
//! | query keyword found in item keywords or content          | 0.3 each    |
//! | whole normalized query contained in content              | 0.8         |
//! | space-separated query word found inside a content word   | 0.1 each    |
//! | query intent is `general` or equals the item category    | 0.2         |

use serde::{Deserialize, Serialize};

use crate::keywords::{tokenize, QUERY_STOP_WORDS};
use crate::knowledge::{KnowledgeItem, ALL_CATEGORIES};

// ---------------------------------------------------------------------------
// Weights and defaults
// ---------------------------------------------------------------------------

pub const KEYWORD_MATCH_WEIGHT: f64 = 0.3;
pub const FULL_MATCH_WEIGHT: f64 = 0.8;
pub const WORD_MATCH_WEIGHT: f64 = 0.1;
pub const INTENT_MATCH_WEIGHT: f64 = 0.2;
pub const MAX_SIMILARITY: f64 = 1.0;

/// Default minimum similarity for a hit.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Default number of hits returned by the search endpoint.
pub const DEFAULT_SEARCH_RESULTS: usize = 5;

/// Number of hits injected into a chat prompt.
pub const CHAT_CONTEXT_RESULTS: usize = 3;

/// Result count at which the count factor of the confidence score saturates.
const CONFIDENCE_SATURATION: f64 = 5.0;

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// Coarse topic of a query, matched against item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Product,
    Service,
    Policy,
    Technical,
    Faq,
    General,
}

/// Intent trigger words, checked in this order. First hit wins.
const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (Intent::Product, &["产品", "功能", "特性", "版本", "价格"]),
    (Intent::Service, &["服务", "支持", "帮助", "联系", "客服"]),
    (Intent::Policy, &["政策", "条款", "保修", "退款", "隐私"]),
    (Intent::Technical, &["技术", "API", "集成", "开发", "文档"]),
    (Intent::Faq, &["问题", "常见", "如何", "怎么", "为什么"]),
];

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Product => "product",
            Intent::Service => "service",
            Intent::Policy => "policy",
            Intent::Technical => "technical",
            Intent::Faq => "faq",
            Intent::General => "general",
        }
    }
}

/// Classify the raw (not lowercased) query by trigger words.
pub fn classify_intent(query: &str) -> Intent {
    INTENT_TABLE
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| query.contains(t)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::General)
}

// ---------------------------------------------------------------------------
// Query preprocessing
// ---------------------------------------------------------------------------

/// Extract keywords from a user query.
pub fn extract_query_keywords(query: &str) -> Vec<String> {
    tokenize(query, QUERY_STOP_WORDS)
}

/// A query prepared for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedQuery {
    pub original: String,
    pub normalized: String,
    pub keywords: Vec<String>,
    pub intent: Intent,
}

impl ProcessedQuery {
    pub fn new(query: &str) -> Self {
        Self {
            original: query.to_string(),
            normalized: query.trim().to_lowercase(),
            keywords: extract_query_keywords(query),
            intent: classify_intent(query),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// An item paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item: KnowledgeItem,
    pub similarity: f64,
}

/// Similarity of `item` to `query`, in `[0, 1]`.
pub fn text_similarity(query: &ProcessedQuery, item: &KnowledgeItem) -> f64 {
    let content = item.content.to_lowercase();
    let mut score = 0.0;

    let keyword_hits = query
        .keywords
        .iter()
        .filter(|k| item.keywords.contains(k) || content.contains(k.as_str()))
        .count();
    score += keyword_hits as f64 * KEYWORD_MATCH_WEIGHT;

    if !query.normalized.is_empty() && content.contains(&query.normalized) {
        score += FULL_MATCH_WEIGHT;
    }

    let content_words: Vec<&str> = content.split(' ').collect();
    let word_hits = query
        .normalized
        .split(' ')
        .filter(|w| !w.is_empty())
        .filter(|w| content_words.iter().any(|cw| cw.contains(w)))
        .count();
    score += word_hits as f64 * WORD_MATCH_WEIGHT;

    if query.intent == Intent::General || query.intent.as_str() == item.category {
        score += INTENT_MATCH_WEIGHT;
    }

    score.min(MAX_SIMILARITY)
}

/// Score every item against `query`, preserving input order.
pub fn score_items(query: &ProcessedQuery, items: &[KnowledgeItem]) -> Vec<ScoredItem> {
    items
        .iter()
        .map(|item| ScoredItem {
            item: item.clone(),
            similarity: text_similarity(query, item),
        })
        .collect()
}

/// Filtering and truncation applied after scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalOptions {
    /// Category to restrict hits to, or `"all"`.
    pub context_type: String,
    pub max_results: usize,
    pub threshold: f64,
}

impl RetrievalOptions {
    /// Settings used to build chat prompt context.
    pub fn for_chat(context_type: &str) -> Self {
        Self {
            context_type: context_type.to_string(),
            max_results: CHAT_CONTEXT_RESULTS,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            context_type: ALL_CATEGORIES.to_string(),
            max_results: DEFAULT_SEARCH_RESULTS,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Score, filter by category and threshold, sort best-first and truncate.
///
/// The sort is stable: items with equal similarity keep store order.
pub fn retrieve(
    query: &ProcessedQuery,
    items: &[KnowledgeItem],
    options: &RetrievalOptions,
) -> Vec<ScoredItem> {
    let mut hits: Vec<ScoredItem> = score_items(query, items)
        .into_iter()
        .filter(|hit| {
            options.context_type == ALL_CATEGORIES || hit.item.category == options.context_type
        })
        .filter(|hit| hit.similarity >= options.threshold)
        .collect();

    hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    hits.truncate(options.max_results);
    hits
}

// ---------------------------------------------------------------------------
// Result annotation
// ---------------------------------------------------------------------------

/// Per-hit confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

pub fn confidence_level(similarity: f64) -> ConfidenceLevel {
    if similarity >= 0.8 {
        ConfidenceLevel::High
    } else if similarity >= 0.5 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Overall confidence of a result set, rounded to two decimals.
///
/// Blends the mean similarity (70%) with a result-count factor (30%) that
/// saturates at five results. An empty set scores `0`.
pub fn confidence_score(similarities: &[f64]) -> f64 {
    if similarities.is_empty() {
        return 0.0;
    }

    let n = similarities.len() as f64;
    let average = similarities.iter().sum::<f64>() / n;
    let count_factor = (n / CONFIDENCE_SATURATION).min(1.0);

    ((average * 0.7 + count_factor * 0.3) * 100.0).round() / 100.0
}

/// Human-readable explanation of why `content` matched `query`.
pub fn relevance_reason(content: &str, query: &ProcessedQuery) -> String {
    let content = content.to_lowercase();
    let matched: Vec<&str> = query
        .keywords
        .iter()
        .filter(|k| content.contains(k.as_str()))
        .map(String::as_str)
        .collect();

    if !matched.is_empty() {
        return format!("匹配关键词: {}", matched.join(", "));
    }

    if content.contains(&query.normalized) {
        return "包含完整查询内容".to_string();
    }

    "语义相似度匹配".to_string()
}

/// Render hits as prompt context, one `[category] content (相关度: x.xx)`
/// line per hit.
pub fn build_context(hits: &[ScoredItem]) -> String {
    hits.iter()
        .map(|hit| {
            format!(
                "[{}] {} (相关度: {:.2})",
                hit.item.category, hit.item.content, hit.similarity
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::seed_items;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn item(id: &str, content: &str, category: &str, keywords: &[&str]) -> KnowledgeItem {
        KnowledgeItem {
            id: id.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            created_at: chrono::Utc::now(),
        }
    }

    // -- intent --------------------------------------------------------------

    #[test]
    fn intent_first_table_wins() {
        // "产品" (product) and "保修" (policy) both occur; product is checked first.
        assert_eq!(classify_intent("产品保修多久"), Intent::Product);
        assert_eq!(classify_intent("退款政策"), Intent::Policy);
        assert_eq!(classify_intent("API 文档在哪"), Intent::Technical);
        assert_eq!(classify_intent("hello"), Intent::General);
    }

    #[test]
    fn intent_match_is_case_sensitive_on_raw_query() {
        assert_eq!(classify_intent("api docs"), Intent::General);
    }

    // -- preprocessing -------------------------------------------------------

    #[test]
    fn processed_query_normalizes() {
        let q = ProcessedQuery::new("  Reset PASSWORD  ");
        assert_eq!(q.normalized, "reset password");
        assert_eq!(q.keywords, vec!["reset", "password"]);
        assert_eq!(q.intent, Intent::General);
    }

    // -- similarity ----------------------------------------------------------

    #[test]
    fn keyword_word_and_intent_signals_add_up() {
        let items = seed_items();
        let q = ProcessedQuery::new("保修期 退款");
        // keyword "保修期" (0.3) + word "保修期" (0.1) + policy intent (0.2)
        assert!(approx(text_similarity(&q, &items[2]), 0.6));
        assert!(approx(text_similarity(&q, &items[0]), 0.0));
    }

    #[test]
    fn similarity_is_capped_at_one() {
        let items = seed_items();
        let q = ProcessedQuery::new("API");
        assert!(approx(text_similarity(&q, &items[3]), 1.0));
    }

    #[test]
    fn general_intent_always_earns_intent_weight() {
        let q = ProcessedQuery::new("zzz");
        let it = item("x", "unrelated text", "billing", &[]);
        assert!(approx(text_similarity(&q, &it), INTENT_MATCH_WEIGHT));
    }

    #[test]
    fn repeated_spaces_do_not_inflate_word_matches() {
        let it = item("x", "reset your password here", "faq", &[]);
        let single = ProcessedQuery::new("reset password");
        let padded = ProcessedQuery::new("reset    password");
        assert!(approx(
            text_similarity(&single, &it),
            text_similarity(&padded, &it)
        ));
    }

    // -- retrieve ------------------------------------------------------------

    #[test]
    fn retrieve_filters_sorts_and_truncates() {
        let items = vec![
            item("a", "reset password via email", "faq", &[]),
            item("b", "password policy", "policy", &[]),
            item("c", "reset password via email link", "faq", &["reset"]),
        ];
        let q = ProcessedQuery::new("reset password");

        let hits = retrieve(&q, &items, &RetrievalOptions::default());
        let ids: Vec<&str> = hits.iter().map(|h| h.item.id.as_str()).collect();
        // a and c tie at 1.0 and keep store order; b scores 0.3 + 0.1 + 0.2.
        assert_eq!(ids, vec!["a", "c", "b"]);

        let options = RetrievalOptions {
            context_type: "policy".into(),
            ..RetrievalOptions::default()
        };
        let hits = retrieve(&q, &items, &options);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.id, "b");

        let options = RetrievalOptions {
            max_results: 1,
            ..RetrievalOptions::default()
        };
        assert_eq!(retrieve(&q, &items, &options).len(), 1);
    }

    #[test]
    fn retrieve_applies_threshold() {
        let items = seed_items();
        let q = ProcessedQuery::new("保修期 退款");
        let hits = retrieve(&q, &items, &RetrievalOptions::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item.id, "policy-001");

        let strict = RetrievalOptions {
            threshold: 0.9,
            ..RetrievalOptions::default()
        };
        assert!(retrieve(&q, &items, &strict).is_empty());
    }

    // -- annotation ----------------------------------------------------------

    #[test]
    fn confidence_score_blends_average_and_count() {
        assert_eq!(confidence_score(&[]), 0.0);
        assert!(approx(confidence_score(&[1.0]), 0.76));
        assert!(approx(confidence_score(&[0.5, 0.5, 0.5, 0.5, 0.5, 0.5]), 0.65));
    }

    #[test]
    fn confidence_levels() {
        assert_eq!(confidence_level(0.8), ConfidenceLevel::High);
        assert_eq!(confidence_level(0.5), ConfidenceLevel::Medium);
        assert_eq!(confidence_level(0.49), ConfidenceLevel::Low);
    }

    #[test]
    fn relevance_reason_prefers_keywords() {
        let q = ProcessedQuery::new("reset password");
        assert_eq!(
            relevance_reason("How to RESET a password", &q),
            "匹配关键词: reset, password"
        );

        let q = ProcessedQuery::new("a");
        assert_eq!(relevance_reason("a b", &q), "包含完整查询内容");
        assert_eq!(relevance_reason("xyz", &q), "语义相似度匹配");
    }

    #[test]
    fn context_lists_one_line_per_hit() {
        let hits = vec![
            ScoredItem {
                item: item("a", "first", "faq", &[]),
                similarity: 0.756,
            },
            ScoredItem {
                item: item("b", "second", "policy", &[]),
                similarity: 0.3,
            },
        ];
        assert_eq!(
            build_context(&hits),
            "[faq] first (相关度: 0.76)\n[policy] second (相关度: 0.30)"
        );
    }
}
