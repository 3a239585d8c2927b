use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ragdesk_core::error::CoreError;
use ragdesk_db::StoreError;
use ragdesk_llm::LlmError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, storage and upstream errors along with request
/// validation failures. Implements [`IntoResponse`] to produce consistent
/// JSON error responses of the form `{ "error": message, "code": CODE }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `ragdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A knowledge store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A chat-completions API failure.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Request DTO validation failures.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Storage errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Knowledge store error");
                internal()
            }

            // --- Upstream LLM errors ---
            AppError::Llm(err) => classify_llm_error(err),

            // --- Request validation ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                describe_validation_errors(errors),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify an LLM client error into an HTTP status, error code, and message.
///
/// - Upstream non-2xx responses map to 502 and carry the upstream message.
/// - Transport failures map to 502 with a sanitized message.
/// - A missing API key maps to 503.
fn classify_llm_error(err: &LlmError) -> (StatusCode, &'static str, String) {
    match err {
        LlmError::Api { status, message } => {
            tracing::warn!(upstream_status = status, error = %message, "LLM API returned an error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                format!("LLM API call failed: {message}"),
            )
        }
        LlmError::Request(e) => {
            tracing::error!(error = %e, "LLM API request failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "LLM API request failed".to_string(),
            )
        }
        LlmError::MissingApiKey => (
            StatusCode::SERVICE_UNAVAILABLE,
            "LLM_NOT_CONFIGURED",
            "LLM API key is not configured".to_string(),
        ),
    }
}

/// Flatten field errors into `field: message` pairs, sorted by field name.
fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {detail}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
