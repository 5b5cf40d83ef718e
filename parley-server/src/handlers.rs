//! HTTP request handlers
//!
//! JSON shapes here are a stable contract with the consuming front end;
//! handlers translate between HTTP concerns and the orchestrator/registry.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use parley_core::logging::tail_log_file;

use crate::orchestrator::ChatError;
use crate::state::AppState;

const DEBUG_LOG_LINES: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<String>,
}

/// GET /health, /api/health — service liveness and session count
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    Json(json!({
        "status": "healthy",
        "message": "Parley API is running",
        "timestamp": Utc::now().to_rfc3339(),
        "active_sessions": state.registry.count(),
    }))
}

/// GET /ping — trivial reachability probe
pub async fn ping_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "pong",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// POST /api/chat — the main chat endpoint
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(request)) = payload else {
        warn!("Chat request rejected: body is not valid JSON");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Request must be JSON"})),
        )
            .into_response();
    };

    let session_id = request
        .session_id
        .unwrap_or_else(|| state.registry.default_session_id().to_string());

    match state.orchestrator.converse(&session_id, &request.message).await {
        Ok(reply) => Json(json!({
            "success": true,
            "response": reply.response,
            "session_id": reply.session_id,
            "message_count": reply.message_count,
            "processing_time": reply.processing_time,
            "request_id": reply.request_id,
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response(),

        Err(ChatError::EmptyMessage) => {
            warn!("Chat request rejected: empty message");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Message cannot be empty"})),
            )
                .into_response()
        }

        Err(ChatError::Provider {
            request_id,
            processing_time,
            source,
        }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": source.to_string(),
                "response": format!("Sorry, I encountered an error: {}", source),
                "error_details": {
                    "error": source.to_string(),
                    "kind": source.kind(),
                    "processing_time": processing_time,
                    "request_id": request_id,
                },
            })),
        )
            .into_response(),
    }
}

/// GET /api/sessions — overview of every active session
pub async fn sessions_handler(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Sessions list requested");
    let sessions = state.registry.list();
    Json(json!({
        "success": true,
        "total_sessions": sessions.len(),
        "sessions": sessions,
    }))
}

/// POST /api/sessions/{id}/clear — reset one session's transcript
pub async fn clear_session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    if state.registry.clear(&session_id).await {
        Json(json!({
            "success": true,
            "message": format!("Session {} cleared", session_id),
        }))
        .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "message": format!("Session {} not found", session_id),
            })),
        )
            .into_response()
    }
}

/// GET /api/sessions/{id}/messages — one session's full transcript
pub async fn session_messages_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    debug!("Messages requested for session: {}", session_id);
    let session = state.registry.resolve(&session_id);
    let messages = session.snapshot();
    Json(json!({
        "success": true,
        "session_id": session_id,
        "message_count": messages.len(),
        "messages": messages,
    }))
}

/// GET /api/debug/logs — tail of the service log file
pub async fn debug_logs_handler(State(state): State<AppState>) -> impl IntoResponse {
    let logs = tail_log_file(&state.log_file, DEBUG_LOG_LINES);
    Json(json!({
        "success": true,
        "log_count": logs.len(),
        "logs": logs,
    }))
}

/// Fallback for unmatched routes
pub async fn fallback_handler(uri: Uri) -> impl IntoResponse {
    warn!("404 for path: {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "path": uri.path(),
            "available_endpoints": [
                "/health",
                "/api/health",
                "/ping",
                "/api/chat",
                "/api/sessions",
                "/api/sessions/{id}/clear",
                "/api/sessions/{id}/messages",
                "/api/debug/logs",
            ],
        })),
    )
}
