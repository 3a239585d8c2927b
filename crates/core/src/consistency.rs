//! Heuristic sanity check on a generated answer.

use serde::Serialize;

/// Answers shorter than this (in characters, after trimming) fail the check.
pub const MIN_ANSWER_CHARS: usize = 10;

const BASE_CONFIDENCE: f64 = 0.8;
const EMPTY_ANSWER_CONFIDENCE: f64 = 0.2;
const UNCERTAINTY_PENALTY: f64 = 0.3;
const UNGROUNDED_PENALTY: f64 = 0.1;
const MIN_CONFIDENCE: f64 = 0.1;

/// Hedging words that lower confidence in an answer.
const UNCERTAINTY_WORDS: &[&str] = &["不知道", "不确定", "可能", "也许", "大概"];

/// Phrases showing an answer cites the supplied context.
const GROUNDING_MARKERS: &[&str] = &["根据", "基于"];

/// Outcome of [`check_answer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyCheck {
    pub passed: bool,
    pub issues: Vec<String>,
    pub confidence: f64,
}

/// Check `answer` for emptiness, hedging, and (when `context` is non-empty)
/// whether it appears to draw on the retrieved context.
pub fn check_answer(answer: &str, context: &str) -> ConsistencyCheck {
    let mut check = ConsistencyCheck {
        passed: true,
        issues: Vec::new(),
        confidence: BASE_CONFIDENCE,
    };

    if answer.trim().chars().count() < MIN_ANSWER_CHARS {
        check.passed = false;
        check.issues.push("答案过短或为空".to_string());
        check.confidence = EMPTY_ANSWER_CONFIDENCE;
    }

    if UNCERTAINTY_WORDS.iter().any(|w| answer.contains(w)) {
        check.confidence = (check.confidence - UNCERTAINTY_PENALTY).max(MIN_CONFIDENCE);
    }

    if !context.is_empty() && !GROUNDING_MARKERS.iter().any(|m| answer.contains(m)) {
        check.confidence = (check.confidence - UNGROUNDED_PENALTY).max(MIN_CONFIDENCE);
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn confident_grounded_answer_passes() {
        let check = check_answer("根据资料库，产品保修期为12个月。", "[policy] ...");
        assert!(check.passed);
        assert!(check.issues.is_empty());
        assert!(approx(check.confidence, 0.8));
    }

    #[test]
    fn short_answer_fails() {
        let check = check_answer("  好的  ", "");
        assert!(!check.passed);
        assert_eq!(check.issues, vec!["答案过短或为空"]);
        assert!(approx(check.confidence, 0.2));
    }

    #[test]
    fn hedging_and_missing_grounding_stack() {
        let check = check_answer("这个问题我不确定，建议联系人工客服处理。", "[faq] ...");
        assert!(check.passed);
        assert!(approx(check.confidence, 0.4));
    }

    #[test]
    fn confidence_never_drops_below_floor() {
        let check = check_answer("可能", "[faq] ...");
        assert!(!check.passed);
        assert!(approx(check.confidence, 0.1));
    }

    #[test]
    fn grounding_is_ignored_without_context() {
        let check = check_answer("The warranty lasts twelve months.", "");
        assert!(approx(check.confidence, 0.8));
    }
}
