use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    chat_handler, clear_session_handler, debug_logs_handler, fallback_handler, health_handler,
    ping_handler, session_messages_handler, sessions_handler,
};
use crate::state::AppState;

/// Assemble the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/ping", get(ping_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/sessions", get(sessions_handler))
        .route("/api/sessions/:session_id/clear", post(clear_session_handler))
        .route(
            "/api/sessions/:session_id/messages",
            get(session_messages_handler),
        )
        .route("/api/debug/logs", get(debug_logs_handler))
        .fallback(fallback_handler)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown is requested
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Server shutting down signal received");
        })
        .await?;

    Ok(())
}
