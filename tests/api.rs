//! End-to-end tests driving the router in-process.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use quote_chat::config::PaginationConfig;
use quote_chat::llm::{GenerationProvider, GenerationRequest, ProviderError};
use quote_chat::quotes::QuoteStore;
use quote_chat::server::{AppState, build_app};

struct FailingProvider;

#[async_trait]
impl GenerationProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
        Err(ProviderError::status(503, "unavailable"))
    }
}

struct EchoProvider;

#[async_trait]
impl GenerationProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        Ok(format!(" echo: {} ", request.message))
    }
}

fn store() -> Arc<QuoteStore> {
    let store = QuoteStore::from_json(json!({
        "quotes": [
            {"id": "q1", "text": "Test quote 1", "author": "Alice"},
            {"id": "q2", "text": "Test quote 2", "author": "Bob"},
            {"id": "q3", "text": "Something else", "author": "Carol"}
        ]
    }));
    Arc::new(store.unwrap_or_else(|e| panic!("fixture should load: {e}")))
}

fn app_with(store: Arc<QuoteStore>, provider: Option<Arc<dyn GenerationProvider>>) -> Router {
    build_app(AppState::new(store, provider, PaginationConfig::default()).shared())
}

fn app() -> Router {
    app_with(store(), None)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(request)
        .await
        .unwrap_or_else(|e| panic!("router error: {e}"));
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_else(|e| panic!("bad request: {e}"));
    send(app, request).await
}

async fn post_chat_raw(app: Router, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri("/api/chat");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|e| panic!("bad request: {e}"));
    send(app, request).await
}

async fn post_chat(app: Router, body: &Value) -> (StatusCode, Value) {
    post_chat_raw(app, Some("application/json"), &body.to_string()).await
}

#[tokio::test]
async fn health_reports_quote_count() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["quotes"], 3);
    assert_eq!(body["provider"], "fallback");
}

#[tokio::test]
async fn paginates_quotes() {
    let (status, body) = get(app(), "/api/quotes?page=1&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quotes"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalPages"], 2);

    let (_, body) = get(app(), "/api/quotes?page=2&limit=2").await;
    assert_eq!(body["quotes"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["page"], 2);
}

#[tokio::test]
async fn page_beyond_end_is_empty() {
    let (status, body) = get(app(), "/api/quotes?page=9&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quotes"], json!([]));
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalPages"], 2);
}

#[tokio::test]
async fn clamps_and_defaults_page_params() {
    let (_, body) = get(app(), "/api/quotes?page=abc&limit=1000").await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 100);

    let (_, body) = get(app(), "/api/quotes").await;
    assert_eq!(body["limit"], 10);
    assert_eq!(body["quotes"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn searches_quotes() {
    let (status, body) = get(app(), "/api/quotes?contains=Test%20quote%201").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["quotes"][0]["text"], "Test quote 1");

    let (_, body) = get(app(), "/api/quotes?contains=bob").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["quotes"][0]["id"], "q2");
}

#[tokio::test]
async fn fetches_quote_by_id() {
    let (status, body) = get(app(), "/api/quotes/q3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], "Carol");

    let (status, body) = get(app(), "/api/quotes/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Quote not found");
}

#[tokio::test]
async fn random_quote_comes_from_store() {
    let (status, body) = get(app(), "/api/quotes/random").await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap_or_default();
    assert!(["q1", "q2", "q3"].contains(&id));

    let empty = app_with(Arc::new(QuoteStore::default()), None);
    let (status, _) = get(empty, "/api/quotes/random").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_fallback_in_arabic() {
    let (status, body) = post_chat(app(), &json!({"message": "hi", "language": "ar"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["direction"], "rtl");
    assert_eq!(body["provider"], "fallback");
    assert!(body["quote"]["id"].is_string());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn chat_validation_reports_every_error() {
    let (status, body) = post_chat(
        app(),
        &json!({"message": "", "language": "xx", "history": [{"role": "bot"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["details"],
        json!([
            "Message is required and must be a non-empty string",
            "Language must be one of: en, ar, ckb",
            "History item 0 must have role 'user' or 'assistant'",
            "History item 0 must have content as string"
        ])
    );
}

#[tokio::test]
async fn chat_uses_provider_when_it_answers() {
    let app = app_with(store(), Some(Arc::new(EchoProvider)));
    let (status, body) = post_chat(
        app,
        &json!({
            "message": "  hello  ",
            "history": [{"role": "assistant", "content": "earlier"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "echo: hello");
    assert_eq!(body["provider"], "echo");
    assert_eq!(body["language"], "en");
    assert!(body.get("quote").is_none());
}

#[tokio::test]
async fn chat_survives_provider_failure_and_empty_store() {
    let app = app_with(
        Arc::new(QuoteStore::default()),
        Some(Arc::new(FailingProvider)),
    );
    let (status, body) = post_chat(app, &json!({"message": "hi"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "fallback");
    assert_eq!(body["error"], true);
    assert_eq!(body["direction"], "ltr");
}

#[tokio::test]
async fn lists_languages() {
    let (status, body) = get(app(), "/api/languages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["code"], "en");
    assert_eq!(body[2]["code"], "ckb");
    assert_eq!(body[2]["direction"], "rtl");
}

#[tokio::test]
async fn truncated_chat_body_gets_json_error() {
    let (status, body) = post_chat_raw(app(), Some("application/json"), r#"{"message": "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn chat_body_without_content_type_gets_json_error() {
    let (status, body) = post_chat_raw(app(), None, r#"{"message": "hi"}"#).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("Content-Type")));
}
