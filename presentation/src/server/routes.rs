//! HTTP routes for the chat endpoint.
//!
//! `POST /api/chat` takes `{ "message": "...", "conversationHistory": [...] }`
//! and answers with the generated turn. Errors are `{ "error": "..." }`.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use flowgrid_application::GenerateDiagramUseCase;
use flowgrid_domain::{DomainError, GenerationRequest, Message};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Error body when no upstream credential is available
pub const NOT_CONFIGURED_ERROR: &str = "OpenRouter API key not configured";

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub use_case: Arc<GenerateDiagramUseCase>,
}

impl AppState {
    pub fn new(use_case: GenerateDiagramUseCase) -> Self {
        Self {
            use_case: Arc::new(use_case),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/chat: generate one turn.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(message) => {
            warn!("Rejected chat request: {}", message);
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };

    if !state.use_case.is_configured() {
        error!("{}", NOT_CONFIGURED_ERROR);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, NOT_CONFIGURED_ERROR);
    }

    match state.use_case.execute(&request).await {
        Ok(result) => {
            info!(
                "Chat turn done: status {:?}, {} model calls",
                result.status, result.attempts
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => {
            error!("Chat API error: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Validate the body into a request; the error is the client-facing message.
fn parse_request(body: &[u8]) -> Result<GenerationRequest, String> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON body: {}", e))?;

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| DomainError::EmptyMessage.to_string())?;

    let history: Vec<Message> = match value.get("conversationHistory") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value(raw.clone())
            .map_err(|e| format!("Invalid conversationHistory: {}", e))?,
    };

    GenerationRequest::new(message, history).map_err(|e| e.to_string())
}
