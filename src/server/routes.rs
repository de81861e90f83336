//! HTTP route handlers for the quote API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::services::ServeDir;

use crate::chat::{self, ChatRequest, ChatResponse, LanguageInfo};
use crate::quotes::{PageRequest, PageResult, Quote, QuoteError};

use super::state::AppState;

/// Error half of every handler result.
type ApiError = (StatusCode, Json<Value>);

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/quotes", get(list_quotes))
        .route("/api/quotes/random", get(random_quote))
        .route("/api/quotes/{id}", get(quote_by_id))
        .route("/api/chat", post(chat_reply))
        .route("/api/languages", get(list_languages));

    let router = match &state.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.with_state(state)
}

fn json_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(json!({ "error": message.to_string() })))
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "quotes": state.store.count(),
        "provider": state.chat.provider_name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Quote listing query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring filter on text or author.
    pub contains: Option<String>,
    /// 1-based page, as sent by the client.
    pub page: Option<String>,
    /// Page size, as sent by the client.
    pub limit: Option<String>,
}

/// List or search quotes.
async fn list_quotes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<PageResult> {
    let request = PageRequest::from_query(
        query.page.as_deref(),
        query.limit.as_deref(),
        state.pagination.default_limit,
        state.pagination.max_limit,
    );

    Json(
        state
            .store
            .search(query.contains.as_deref(), request.page, request.limit),
    )
}

/// One random quote.
async fn random_quote(State(state): State<Arc<AppState>>) -> Result<Json<Quote>, ApiError> {
    state
        .store
        .random_one()
        .map(|q| Json(q.clone()))
        .map_err(|e| json_error(StatusCode::NOT_FOUND, e))
}

/// Exact lookup by id.
async fn quote_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Quote>, ApiError> {
    state
        .store
        .by_id(&id)
        .map(|q| Json(q.clone()))
        .ok_or_else(|| json_error(StatusCode::NOT_FOUND, QuoteError::NotFound(id)))
}

/// Validate a chat request and answer it.
async fn chat_reply(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Rejected chat body: {rejection}");
        json_error(rejection.status(), rejection.body_text())
    })?;

    let errors = chat::validate(&body);
    if !errors.is_empty() {
        tracing::debug!("Rejected chat request: {errors:?}");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Validation failed", "details": errors })),
        ));
    }

    let request: ChatRequest = serde_json::from_value(body)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, format!("Invalid request: {e}")))?;
    let history = request.history.unwrap_or_default();

    let response = state
        .chat
        .respond(request.message.trim(), request.language.as_deref(), &history)
        .await;

    Ok(Json(response))
}

/// Supported chat languages.
async fn list_languages() -> Json<Vec<LanguageInfo>> {
    Json(chat::languages())
}
