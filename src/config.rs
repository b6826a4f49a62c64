//! Service configuration: optional TOML file plus environment overrides.
//!
//! TOML schema (every key optional):
//!
//! ```toml
//! backend_url = "http://127.0.0.1:8080"
//! request_timeout_secs = 15
//!
//! [chat]
//! model = "gpt-4"
//! max_tokens = 1000
//! system_prompt = "You are a friendly Korean tutor."
//! ```
//!
//! Environment always wins over the file: BACKEND_URL, OPENAI_CHAT_MODEL.

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub backend_url: String,
  pub request_timeout_secs: u64,
  pub chat: ChatSettings,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      backend_url: DEFAULT_BACKEND_URL.into(),
      request_timeout_secs: DEFAULT_TIMEOUT_SECS,
      chat: ChatSettings::default(),
    }
  }
}

/// Settings for the chat completion proxy. The API key itself only ever comes from env.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
  pub model: String,
  pub max_tokens: u32,
  /// Prepended as a system message when non-empty.
  pub system_prompt: Option<String>,
}

impl Default for ChatSettings {
  fn default() -> Self {
    Self { model: DEFAULT_CHAT_MODEL.into(), max_tokens: DEFAULT_MAX_TOKENS, system_prompt: None }
  }
}

impl AppConfig {
  /// Load from JAEMI_CONFIG_PATH (if set) and apply env overrides.
  /// Never fails: a broken file is logged and defaults are used.
  pub fn load() -> Self {
    let mut cfg = load_file_from_env().unwrap_or_default();
    cfg.apply_env_overrides(|key| std::env::var(key).ok());
    cfg
  }

  fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
    if let Some(url) = var("BACKEND_URL").filter(|s| !s.trim().is_empty()) {
      self.backend_url = url;
    }
    if let Some(model) = var("OPENAI_CHAT_MODEL").filter(|s| !s.trim().is_empty()) {
      self.chat.model = model;
    }
    // Tolerate a trailing slash so url joins stay clean.
    while self.backend_url.ends_with('/') {
      self.backend_url.pop();
    }
  }
}

fn load_file_from_env() -> Option<AppConfig> {
  let path = std::env::var("JAEMI_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse(&s) {
      Ok(cfg) => {
        info!(target: "jaemi_backend", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "jaemi_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "jaemi_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

fn parse(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s)
}
