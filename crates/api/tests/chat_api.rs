//! Integration tests for `POST /api/chat` against a mock LLM server.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, post_json, BrokenStore, MockLlm};
use ragdesk_core::knowledge::seed_items;
use serde_json::json;

const GROUNDED_REPLY: &str = "根据资料库，我们的系统支持API集成，并提供Webhook回调。";

#[tokio::test]
async fn chat_injects_retrieved_context_into_prompt() {
    let llm = MockLlm::replying(GROUNDED_REPLY).await;
    let app = common::build_test_app_with(seed_items(), common::test_config(&llm.url));

    let response = post_json(app, "/api/chat", json!({ "message": "API" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["message"], "API");
    assert_eq!(data["response"], GROUNDED_REPLY);
    assert_eq!(data["model"], "deepseek-chat");
    assert_eq!(data["use_rag"], true);
    assert!(data["rag_context"]
        .as_str()
        .unwrap()
        .starts_with("[technical] 系统支持API集成"));
    assert_eq!(data["rag_metadata"]["total_found"], 1);
    assert_eq!(data["rag_metadata"]["confidence_score"], 0.76);
    assert_eq!(data["rag_metadata"]["results"][0]["id"], "technical-001");
    assert_eq!(data["consistency_check"]["passed"], true);
    assert_eq!(data["consistency_check"]["confidence"], 0.8);
    assert_eq!(data["usage"]["total_tokens"], 20);

    let request = llm.last_request().expect("LLM was not called");
    assert_eq!(request["model"], "deepseek-chat");
    assert_eq!(request["stream"], false);
    assert_eq!(request["max_tokens"], 1500);
    assert_eq!(request["messages"][1]["content"], "API");

    let system = llm.last_system_prompt();
    assert!(system.contains("[technical] 系统支持API集成"));
    assert!(system.contains("(相关度: 1.00)"));
    assert!(system.contains("较高的可信度（置信度: 0.76）"));
}

#[tokio::test]
async fn chat_without_rag_sends_base_prompt() {
    let llm = MockLlm::replying(GROUNDED_REPLY).await;
    let app = common::build_test_app_with(seed_items(), common::test_config(&llm.url));

    let json = body_json(
        post_json(
            app,
            "/api/chat",
            json!({ "message": "API", "use_rag": false, "model": "deepseek-reasoner" }),
        )
        .await,
    )
    .await;

    assert_eq!(json["data"]["use_rag"], false);
    assert_eq!(json["data"]["rag_context"], "");
    assert!(json["data"]["rag_metadata"].is_null());
    assert_eq!(json["data"]["model"], "deepseek-reasoner");

    assert_eq!(llm.last_request().unwrap()["model"], "deepseek-reasoner");
    assert!(!llm.last_system_prompt().contains("请基于以下资料库内容"));
}

#[tokio::test]
async fn chat_context_type_limits_retrieval() {
    let llm = MockLlm::replying(GROUNDED_REPLY).await;
    let app = common::build_test_app_with(seed_items(), common::test_config(&llm.url));

    let json = body_json(
        post_json(
            app,
            "/api/chat",
            json!({ "message": "API", "context_type": "faq" }),
        )
        .await,
    )
    .await;

    assert_eq!(json["data"]["rag_context"], "");
    assert!(json["data"]["rag_metadata"].is_null());
}

#[tokio::test]
async fn hedging_answer_lowers_consistency_confidence() {
    let llm = MockLlm::replying("这个问题我不确定，建议您联系人工客服获取帮助。").await;
    let app = common::build_test_app_with(seed_items(), common::test_config(&llm.url));

    let json = body_json(post_json(app, "/api/chat", json!({ "message": "API" })).await).await;
    let check = &json["data"]["consistency_check"];

    assert_eq!(check["passed"], true);
    let confidence = check["confidence"].as_f64().unwrap();
    assert!((confidence - 0.4).abs() < 1e-9, "got {confidence}");
}

#[tokio::test]
async fn empty_completion_falls_back_to_apology() {
    let llm = MockLlm::replying("").await;
    let app = common::build_test_app_with(seed_items(), common::test_config(&llm.url));

    let json = body_json(post_json(app, "/api/chat", json!({ "message": "API" })).await).await;
    assert_eq!(json["data"]["response"], "抱歉，我无法生成回复。");
}

#[tokio::test]
async fn upstream_error_maps_to_bad_gateway() {
    let llm = MockLlm::failing(StatusCode::UNAUTHORIZED, "Authentication Fails").await;
    let app = common::build_test_app_with(seed_items(), common::test_config(&llm.url));

    let response = post_json(app, "/api/chat", json!({ "message": "API" })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "LLM API call failed: Authentication Fails");
}

#[tokio::test]
async fn unreachable_llm_maps_to_bad_gateway_without_details() {
    // Nothing listens on the discard port.
    let app = common::build_test_app();

    let response = post_json(app, "/api/chat", json!({ "message": "API" })).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert_eq!(json["error"], "LLM API request failed");
    assert!(!json.to_string().contains("127.0.0.1"));
}

#[tokio::test]
async fn store_failure_answers_without_context() {
    let llm = MockLlm::replying(GROUNDED_REPLY).await;
    let app =
        common::build_test_app_with_store(Arc::new(BrokenStore), common::test_config(&llm.url));

    let response = post_json(app, "/api/chat", json!({ "message": "API" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["response"], GROUNDED_REPLY);
    assert_eq!(json["data"]["rag_context"], "");
    assert!(json["data"]["rag_metadata"].is_null());
    assert!(!llm.last_system_prompt().contains("请基于以下资料库内容"));
}

#[tokio::test]
async fn missing_api_key_returns_503() {
    let llm = MockLlm::replying(GROUNDED_REPLY).await;
    let mut config = common::test_config(&llm.url);
    config.llm.api_key = None;
    let app = common::build_test_app_with(seed_items(), config);

    let response = post_json(app, "/api/chat", json!({ "message": "API" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(llm.last_request().is_none());
}

#[tokio::test]
async fn blank_message_is_rejected_before_calling_llm() {
    let llm = MockLlm::replying(GROUNDED_REPLY).await;
    let app = common::build_test_app_with(seed_items(), common::test_config(&llm.url));

    let response = post_json(app, "/api/chat", json!({ "message": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(llm.last_request().is_none());
}
