//! Application state shared by HTTP handlers and WebSocket sessions.
//!
//! Holds the resolved configuration, the content API client, and the optional
//! chat client. Nothing here caches lesson data: every request fetches fresh.

use std::time::Duration;

use tracing::{info, instrument};

use crate::chat::ChatClient;
use crate::config::AppConfig;
use crate::content::ContentClient;

#[derive(Clone)]
pub struct AppState {
  pub config: AppConfig,
  pub content: ContentClient,
  pub chat: Option<ChatClient>,
}

impl AppState {
  /// Build state from env + optional TOML config.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Result<Self, reqwest::Error> {
    let config = AppConfig::load();
    let content = ContentClient::new(config.backend_url.clone(), Duration::from_secs(config.request_timeout_secs))?;
    info!(target: "jaemi_backend", backend_url = %content.base_url(), timeout_secs = config.request_timeout_secs, "Content API client ready");

    let chat = ChatClient::from_env(&config.chat);
    if let Some(c) = &chat {
      info!(target: "jaemi_backend", base_url = %c.base_url, model = %c.settings.model, "Chat enabled.");
    } else {
      info!(target: "jaemi_backend", "Chat disabled (no OPENAI_API_KEY).");
    }

    Ok(Self::from_parts(config, content, chat))
  }

  pub fn from_parts(config: AppConfig, content: ContentClient, chat: Option<ChatClient>) -> Self {
    Self { config, content, chat }
  }
}
