#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use ragdesk_api::config::{LlmConfig, ServerConfig, StoreConfig};
use ragdesk_api::router::build_app_router;
use ragdesk_api::state::AppState;
use ragdesk_core::knowledge::{seed_items, KnowledgeItem};
use ragdesk_db::{FileKnowledgeStore, KnowledgeStore, StoreError};
use ragdesk_llm::ChatCompletionsApi;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Build a test `ServerConfig` pointing at `llm_url`.
pub fn test_config(llm_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        llm: LlmConfig {
            api_url: llm_url.to_string(),
            api_key: Some("sk-test".to_string()),
            default_model: "deepseek-chat".to_string(),
        },
        store: StoreConfig::File("unused.json".into()),
    }
}

/// Build the full application router over an in-memory store seeded with
/// `items`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app_with(items: Vec<KnowledgeItem>, config: ServerConfig) -> Router {
    build_test_app_with_store(Arc::new(FileKnowledgeStore::in_memory(items)), config)
}

/// Build the application router over an arbitrary store.
pub fn build_test_app_with_store(store: Arc<dyn KnowledgeStore>, config: ServerConfig) -> Router {
    let llm = ChatCompletionsApi::new(config.llm.api_url.clone(), config.llm.api_key.clone());
    let state = AppState {
        store,
        llm: Arc::new(llm),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Seeded store, LLM pointed at an address nothing listens on.
pub fn build_test_app() -> Router {
    build_test_app_with(seed_items(), test_config("http://127.0.0.1:9"))
}

// ---------------------------------------------------------------------------
// Broken store
// ---------------------------------------------------------------------------

/// A store whose every operation fails with an I/O error.
pub struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Io(std::io::Error::other("disk unavailable"))
}

#[async_trait]
impl KnowledgeStore for BrokenStore {
    fn backend(&self) -> &'static str {
        "broken"
    }

    async fn all(&self) -> Result<Vec<KnowledgeItem>, StoreError> {
        Err(broken())
    }

    async fn insert(&self, _item: KnowledgeItem) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn delete(&self, _id: &str) -> Result<Option<KnowledgeItem>, StoreError> {
        Err(broken())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Err(broken())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(broken())
    }
}

// ---------------------------------------------------------------------------
// Mock chat-completions server
// ---------------------------------------------------------------------------

/// A mock chat-completions API that records the last request body.
pub struct MockLlm {
    pub url: String,
    last_request: Arc<Mutex<Option<Value>>>,
}

impl MockLlm {
    /// Start a mock that answers every request with `reply`.
    pub async fn replying(reply: &str) -> Self {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": reply } }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 }
        });
        Self::start(StatusCode::OK, body).await
    }

    /// Start a mock that fails every request with `status` and `message`.
    pub async fn failing(status: StatusCode, message: &str) -> Self {
        Self::start(status, json!({ "error": { "message": message } })).await
    }

    async fn start(status: StatusCode, body: Value) -> Self {
        let last_request = Arc::new(Mutex::new(None));
        let recorder = Arc::clone(&last_request);

        let router = Router::new().route(
            "/chat/completions",
            post(move |Json(request): Json<Value>| {
                let recorder = Arc::clone(&recorder);
                let body = body.clone();
                async move {
                    *recorder.lock().unwrap() = Some(request);
                    (status, Json(body))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            last_request,
        }
    }

    /// Body of the most recent request, if any.
    pub fn last_request(&self) -> Option<Value> {
        self.last_request.lock().unwrap().clone()
    }

    /// System prompt of the most recent request.
    pub fn last_system_prompt(&self) -> String {
        self.last_request()
            .and_then(|r| r["messages"][0]["content"].as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
