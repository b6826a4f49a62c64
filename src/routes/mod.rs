//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket study session at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static study SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/difficulties", get(http::http_get_difficulties))
        .route("/api/v1/levels/:difficulty_id", get(http::http_get_level))
        .route("/api/v1/lessons/:difficulty_id", get(http::http_get_lessons))
        .route("/api/v1/lessons/:difficulty_id/:lesson_id", get(http::http_get_lesson))
        .route("/api/v1/lessons/:difficulty_id/:lesson_id/flashcards", get(http::http_get_flashcards))
        .route("/api/v1/lessons/:difficulty_id/:lesson_id/summary", get(http::http_get_summary))
        .route("/api/v1/lessons/:difficulty_id/:lesson_id/exam", post(http::http_post_exam))
        .route("/api/v1/vocabulary/:lesson_id", get(http::http_get_vocabulary))
        .route("/api/v1/chat", post(http::http_post_chat))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
