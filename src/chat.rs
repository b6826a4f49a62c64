//! Minimal chat-completions client behind the study chat tab.
//!
//! Messages from the browser are forwarded as-is (with an optional configured
//! system prompt in front) and only the first choice's text comes back.
//!
//! NOTE: We never log the API key or message contents, only sizes and usage.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::ChatSettings;
use crate::error::ChatError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: String,
  pub content: String,
}

#[derive(Clone)]
pub struct ChatClient {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub settings: ChatSettings,
}

impl ChatClient {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env(settings: &ChatSettings) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url = std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    Self::new(api_key, base_url, settings.clone()).ok()
  }

  pub fn new(api_key: String, base_url: String, settings: ChatSettings) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(Duration::from_secs(60)).build()?;
    Ok(Self { client, api_key, base_url: base_url.trim_end_matches('/').to_string(), settings })
  }

  /// Run one completion and return the assistant's reply text.
  #[instrument(level = "info", skip(self, messages), fields(model = %self.settings.model, message_count = messages.len()))]
  pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ChatError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.settings.model.clone(),
      messages: self.with_system_prompt(messages),
      max_tokens: Some(self.settings.max_tokens),
    };

    let started = std::time::Instant::now();
    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "jaemi-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req)
      .send()
      .await
      .map_err(|e| ChatError::Fetch(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(ChatError::Upstream { status, message });
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| ChatError::Fetch(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(target: "chat", prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .unwrap_or_default();
    info!(target: "chat", elapsed = ?started.elapsed(), reply_len = text.len(), "Chat reply received");
    Ok(text)
  }

  fn with_system_prompt(&self, messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    match self.settings.system_prompt.as_deref().map(str::trim) {
      Some(prompt) if !prompt.is_empty() => {
        let mut out = Vec::with_capacity(messages.len() + 1);
        out.push(ChatMessage { role: "system".into(), content: prompt.to_string() });
        out.extend(messages);
        out
      }
      _ => messages,
    }
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessage>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{http::StatusCode, routing::post, Json, Router};
  use serde_json::{json, Value};
  use tokio::net::TcpListener;

  async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
  }

  fn settings(system_prompt: Option<&str>) -> ChatSettings {
    ChatSettings { system_prompt: system_prompt.map(str::to_string), ..ChatSettings::default() }
  }

  #[tokio::test]
  async fn reply_is_first_choice_verbatim_and_system_prompt_leads() {
    // Echo back the roles the server saw so the test can check ordering.
    let base = serve(Router::new().route(
      "/chat/completions",
      post(|Json(body): Json<Value>| async move {
        let roles: Vec<String> = body["messages"]
          .as_array()
          .unwrap()
          .iter()
          .map(|m| m["role"].as_str().unwrap().to_string())
          .collect();
        Json(json!({
          "choices": [{ "message": { "role": "assistant", "content": format!(" {} ", roles.join(",")) } }],
          "usage": { "prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5 }
        }))
      }),
    ))
    .await;

    let client = ChatClient::new("k".into(), base, settings(Some("Be a Korean tutor."))).unwrap();
    let reply = client
      .complete(vec![ChatMessage { role: "user".into(), content: "안녕하세요".into() }])
      .await
      .unwrap();
    assert_eq!(reply, " system,user ");
  }

  #[tokio::test]
  async fn upstream_error_message_is_extracted() {
    let base = serve(Router::new().route(
      "/chat/completions",
      post(|| async {
        (StatusCode::TOO_MANY_REQUESTS, Json(json!({ "error": { "message": "Rate limit reached" } })))
      }),
    ))
    .await;

    let client = ChatClient::new("k".into(), base, settings(None)).unwrap();
    let err = client.complete(vec![]).await.unwrap_err();
    match err {
      ChatError::Upstream { status, message } => {
        assert_eq!(status, reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(message, "Rate limit reached");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn blank_system_prompt_is_not_sent() {
    let client = ChatClient::new("k".into(), "http://x".into(), settings(Some("   "))).unwrap();
    let msgs = vec![ChatMessage { role: "user".into(), content: "hi".into() }];
    assert_eq!(client.with_system_prompt(msgs.clone()), msgs);
  }
}
