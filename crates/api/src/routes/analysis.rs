use axum::routing::post;
use axum::Router;

use crate::handlers::analysis;
use crate::state::AppState;

/// `POST /text-analysis`.
pub fn router() -> Router<AppState> {
    Router::new().route("/text-analysis", post(analysis::analyze_text))
}
