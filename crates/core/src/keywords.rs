//! Keyword extraction shared by knowledge items and incoming queries.
//!
//! Text is lowercased and split on whitespace plus common ASCII and CJK
//! punctuation. Single-character tokens and stop words are dropped.

use std::sync::LazyLock;

use regex::Regex;

/// Stop words ignored when extracting keywords from a query.
pub const QUERY_STOP_WORDS: &[&str] = &[
    "的", "是", "在", "有", "和", "与", "或", "如何", "什么", "怎么", "为什么",
];

/// Stop words ignored when indexing knowledge item content.
///
/// A superset of [`QUERY_STOP_WORDS`]: pronouns and filler verbs that appear
/// in nearly every support snippet carry no signal for matching.
pub const ITEM_STOP_WORDS: &[&str] = &[
    "的", "是", "在", "有", "和", "与", "或", "如何", "什么", "怎么", "为什么", "我们", "您",
    "可以", "支持", "提供",
];

/// Maximum number of keywords stored on a knowledge item.
pub const MAX_ITEM_KEYWORDS: usize = 5;

static TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,，。！？]").expect("separator pattern is valid"));

/// Split `text` into lowercase tokens, dropping stop words and tokens of a
/// single character.
///
/// Token length is measured in characters, so a two-character CJK word is
/// kept while a lone ideograph is not.
pub fn tokenize(text: &str, stop_words: &[&str]) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_SEPARATOR
        .split(&lowered)
        .filter(|token| token.chars().count() > 1 && !stop_words.contains(token))
        .map(str::to_string)
        .collect()
}
