//! Jaemi · Korean study backend
//!
//! - Fetches lessons from the content API and serves them normalized
//! - Flashcards, summary and exam grading per lesson
//! - Optional chat-completion proxy (via environment variables)
//! - Axum HTTP + WebSocket API, static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   BACKEND_URL       : content API base, default "http://127.0.0.1:8080"
//!   OPENAI_API_KEY    : enables the chat proxy if present
//!   OPENAI_BASE_URL   : default "https://api.openai.com/v1"
//!   OPENAI_CHAT_MODEL : default "gpt-4"
//!   JAEMI_CONFIG_PATH : path to TOML config
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod config;
mod error;
mod decode;
mod domain;
mod wire;
mod normalize;
mod study;
mod content;
mod chat;
mod supersede;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::new()?);
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "jaemi_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "jaemi_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "jaemi_backend", "Shutdown signal received");
}
