//! Prompt construction for the chat and text-analysis endpoints.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Base instructions for the support assistant.
const SUPPORT_SYSTEM_PROMPT: &str = "你是一个专业的AI客服助手，专门帮助用户解答问题。请用中文回答，回答要简洁明了、准确专业。

回答原则：
1. 优先使用提供的资料库信息
2. 如果资料库中没有相关信息，基于你的知识回答
3. 保持专业和友好的语调
4. 如果无法确定答案，诚实说明并建议联系人工客服";

/// Confidence above which retrieved context is presented as reliable.
pub const HIGH_CONFIDENCE: f64 = 0.7;

/// Confidence above which retrieved context is presented as usable with care.
pub const MEDIUM_CONFIDENCE: f64 = 0.4;

/// Build the chat system prompt, appending retrieved `context` when present.
///
/// `confidence` is the overall retrieval confidence and selects the guidance
/// sentence that follows the context block.
pub fn build_system_prompt(context: &str, confidence: Option<f64>) -> String {
    let mut prompt = SUPPORT_SYSTEM_PROMPT.to_string();
    if context.is_empty() {
        return prompt;
    }

    prompt.push_str("\n\n请基于以下资料库内容来回答问题：\n");
    prompt.push_str(context);
    prompt.push_str("\n\n");

    match confidence {
        Some(c) if c > HIGH_CONFIDENCE => prompt.push_str(&format!(
            "这些信息具有较高的可信度（置信度: {c}），请优先使用。"
        )),
        Some(c) if c > MEDIUM_CONFIDENCE => prompt.push_str(&format!(
            "这些信息具有中等可信度（置信度: {c}），请谨慎使用并建议用户核实。"
        )),
        _ => prompt.push_str("这些信息的可信度较低，请结合你的知识进行回答。"),
    }

    prompt
}

// ---------------------------------------------------------------------------
// Text analysis
// ---------------------------------------------------------------------------

/// Kind of analysis requested from the text-analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    General,
    Summary,
    Sentiment,
    Keywords,
    Translation,
    Qa,
    Grammar,
    Creative,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 8] = [
        AnalysisType::General,
        AnalysisType::Summary,
        AnalysisType::Sentiment,
        AnalysisType::Keywords,
        AnalysisType::Translation,
        AnalysisType::Qa,
        AnalysisType::Grammar,
        AnalysisType::Creative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::General => "general",
            AnalysisType::Summary => "summary",
            AnalysisType::Sentiment => "sentiment",
            AnalysisType::Keywords => "keywords",
            AnalysisType::Translation => "translation",
            AnalysisType::Qa => "qa",
            AnalysisType::Grammar => "grammar",
            AnalysisType::Creative => "creative",
        }
    }

    /// Parse a request value, rejecting unknown analysis types.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                CoreError::Validation(format!(
                    "Unknown analysis_type '{value}'. Valid types: {}",
                    valid.join(", ")
                ))
            })
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            AnalysisType::General => "你是一个专业的文本分析师，能够深入分析文本内容。",
            AnalysisType::Summary => "你是一个专业的摘要生成专家，能够生成简洁准确的摘要。",
            AnalysisType::Sentiment => "你是一个专业的情感分析专家，能够准确判断文本的情感倾向。",
            AnalysisType::Keywords => "你是一个专业的关键词提取专家，能够准确提取文本中的关键词。",
            AnalysisType::Translation => "你是一个专业的翻译专家，能够准确翻译文本内容。",
            AnalysisType::Qa => "你是一个专业的问答专家，能够根据文本内容回答问题。",
            AnalysisType::Grammar => "你是一个专业的语法检查专家，能够发现并改进文本中的语法问题。",
            AnalysisType::Creative => "你是一个专业的创意写作专家，能够基于文本内容进行创意扩展。",
        }
    }

    /// User message for this analysis. `qa` without a question falls back to
    /// the general template.
    pub fn user_prompt(self, text: &str, question: Option<&str>) -> String {
        match self {
            AnalysisType::General => format!("请分析以下文本内容：\n\n{text}"),
            AnalysisType::Summary => format!("请为以下文本生成一个简洁的摘要：\n\n{text}"),
            AnalysisType::Sentiment => {
                format!("请分析以下文本的情感倾向（正面、负面、中性）：\n\n{text}")
            }
            AnalysisType::Keywords => format!("请从以下文本中提取关键词：\n\n{text}"),
            AnalysisType::Translation => format!("请将以下文本翻译成中文：\n\n{text}"),
            AnalysisType::Qa => match question.map(str::trim).filter(|q| !q.is_empty()) {
                Some(q) => format!("基于以下文本回答问题：\n\n文本：{text}\n\n问题：{q}"),
                None => AnalysisType::General.user_prompt(text, None),
            },
            AnalysisType::Grammar => {
                format!("请检查以下文本的语法和表达，并提供改进建议：\n\n{text}")
            }
            AnalysisType::Creative => format!("请基于以下文本内容进行创意扩展：\n\n{text}"),
        }
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
