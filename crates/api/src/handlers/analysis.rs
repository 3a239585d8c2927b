//! Handler for LLM-backed text analysis.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ragdesk_core::prompt::{preview, AnalysisType};
use ragdesk_core::types::Timestamp;
use ragdesk_db::models::knowledge_item::not_blank;
use ragdesk_llm::ChatRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Characters of the input echoed back in the response.
const TEXT_PREVIEW_CHARS: usize = 100;

/// Result used when the model returns no content.
pub const FALLBACK_RESULT: &str = "无法分析文本内容。";

/// Body of `POST /api/text-analysis`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalysisBody {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    /// One of the [`AnalysisType`] names (default `general`).
    pub analysis_type: Option<String>,
    /// Question for the `qa` analysis type.
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisReply {
    /// Preview of the analysed text.
    pub text: String,
    pub analysis_type: AnalysisType,
    pub question: Option<String>,
    pub result: String,
    pub model: String,
    pub usage: Option<serde_json::Value>,
    pub timestamp: Timestamp,
}

/// POST /api/text-analysis
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(input): Json<AnalysisBody>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let analysis_type = AnalysisType::parse(input.analysis_type.as_deref().unwrap_or("general"))?;
    let model = state.config.llm.default_model.clone();

    tracing::info!(analysis_type = analysis_type.as_str(), chars = input.text.chars().count(), "Analysing text");

    let request = ChatRequest::analysis(
        &model,
        analysis_type.system_prompt(),
        &analysis_type.user_prompt(&input.text, input.question.as_deref()),
    );
    let completion = state.llm.complete(&request).await?;

    let result = completion
        .first_content()
        .unwrap_or(FALLBACK_RESULT)
        .to_string();

    Ok(Json(DataResponse {
        data: AnalysisReply {
            text: preview(&input.text, TEXT_PREVIEW_CHARS),
            analysis_type,
            question: input.question,
            result,
            model,
            usage: completion.usage,
            timestamp: chrono::Utc::now(),
        },
    }))
}
