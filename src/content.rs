//! Client for the lesson content API.
//!
//! Every call degrades instead of failing: list calls return an empty `Vec`,
//! single-item calls return `None`, and the cause is logged under the `content`
//! target. Callers cannot tell "nothing there" from "backend down"; that is the
//! contract the study views are built against.

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::error::FetchError;
use crate::wire::{RawDifficulty, RawLesson, RawVocab};

#[derive(Clone)]
pub struct ContentClient {
  client: reqwest::Client,
  base_url: String,
}

impl ContentClient {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// `GET /difficulty`
  #[instrument(level = "info", skip(self))]
  pub async fn difficulties(&self) -> Vec<RawDifficulty> {
    self.fetch_list(&["difficulty"], None).await
  }

  /// `GET /difficulty/{difficultyId}/lessons`
  #[instrument(level = "info", skip(self))]
  pub async fn lessons(&self, difficulty_id: &str) -> Vec<RawLesson> {
    self.fetch_list(&["difficulty", difficulty_id, "lessons"], None).await
  }

  /// `GET /difficulty/{difficultyId}/lessons/{lessonId}`
  #[instrument(level = "info", skip(self))]
  pub async fn lesson(&self, difficulty_id: &str, lesson_id: &str) -> Option<RawLesson> {
    let value = match self.fetch_value(&["difficulty", difficulty_id, "lessons", lesson_id], None).await {
      Ok(v) => v,
      Err(e) => {
        error!(target: "content", error = %e, "Failed to fetch lesson");
        return None;
      }
    };

    match serde_json::from_value::<RawLesson>(value) {
      Ok(mut raw) => {
        if raw.lesson_id.is_none() {
          raw.lesson_id = lesson_id.trim().parse().ok();
        }
        Some(raw)
      }
      Err(e) => {
        error!(target: "content", %difficulty_id, %lesson_id, error = %e, "Malformed lesson payload");
        None
      }
    }
  }

  /// `GET /vocabulary?lessonId={lessonId}`
  #[instrument(level = "info", skip(self))]
  pub async fn vocabulary(&self, lesson_id: &str) -> Vec<RawVocab> {
    self.fetch_list(&["vocabulary"], Some(("lessonId", lesson_id))).await
  }

  async fn fetch_list<T: DeserializeOwned>(&self, segments: &[&str], query: Option<(&str, &str)>) -> Vec<T> {
    match self.fetch_value(segments, query).await {
      Ok(v) => list_items(v, segments),
      Err(e) => {
        error!(target: "content", error = %e, "Content request failed; returning empty list");
        Vec::new()
      }
    }
  }

  async fn fetch_value(&self, segments: &[&str], query: Option<(&str, &str)>) -> Result<Value, FetchError> {
    let url = self.endpoint(segments, query)?;
    self.get_json(url).await
  }

  /// Join path segments onto the base url, percent-encoding each one.
  fn endpoint(&self, segments: &[&str], query: Option<(&str, &str)>) -> Result<Url, FetchError> {
    let mut url = Url::parse(&self.base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
    url
      .path_segments_mut()
      .map_err(|_| FetchError::InvalidUrl(self.base_url.clone()))?
      .pop_if_empty()
      .extend(segments);
    if let Some((key, value)) = query {
      url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url)
  }

  async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
    let started = std::time::Instant::now();
    let res = self
      .client
      .get(url.clone())
      .header(USER_AGENT, "jaemi-backend/0.1")
      .header(ACCEPT, "application/json")
      .send()
      .await
      .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

    let status = res.status();
    if !status.is_success() {
      return Err(FetchError::Status { status, url: url.to_string() });
    }

    let bytes = res
      .bytes()
      .await
      .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;
    debug!(target: "content", %url, %status, bytes = bytes.len(), elapsed = ?started.elapsed(), "Content response");
    serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode { url: url.to_string(), source })
  }
}

/// A list payload that is not an array is treated as empty. Elements that do
/// not fit the wire shape are skipped so one bad record can't hide the rest.
fn list_items<T: DeserializeOwned>(value: Value, segments: &[&str]) -> Vec<T> {
  let Value::Array(items) = value else {
    warn!(target: "content", path = %segments.join("/"), "Expected a JSON array; returning empty list");
    return Vec::new();
  };
  items
    .into_iter()
    .enumerate()
    .filter_map(|(idx, item)| match serde_json::from_value::<T>(item) {
      Ok(v) => Some(v),
      Err(e) => {
        warn!(target: "content", path = %segments.join("/"), idx, error = %e, "Skipping malformed record");
        None
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
  };
  use serde_json::json;
  use std::collections::HashMap;
  use tokio::net::TcpListener;

  async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
  }

  fn client(base: &str) -> ContentClient {
    ContentClient::new(base, Duration::from_secs(5)).unwrap()
  }

  #[tokio::test]
  async fn server_error_on_difficulty_list_yields_empty() {
    let base = serve(Router::new().route("/difficulty", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))).await;
    assert!(client(&base).difficulties().await.is_empty());
  }

  #[tokio::test]
  async fn unreachable_backend_yields_empty_and_none() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let c = client(&base);
    assert!(c.lessons("1").await.is_empty());
    assert!(c.lesson("1", "1").await.is_none());
  }

  #[tokio::test]
  async fn difficulties_are_fetched() {
    let base = serve(Router::new().route(
      "/difficulty",
      get(|| async {
        Json(json!([
          { "difficultyId": 1, "name": "Beginner", "description": "basics", "lessonCount": 2 },
          { "difficultyId": 2, "name": "Intermediate", "description": "more", "lessonCount": 5 }
        ]))
      }),
    ))
    .await;
    let got = client(&base).difficulties().await;
    assert_eq!(got.len(), 2);
    assert_eq!(got[1].name, "Intermediate");
  }

  #[tokio::test]
  async fn lessons_skip_malformed_records_and_non_arrays() {
    let base = serve(
      Router::new()
        .route(
          "/difficulty/1/lessons",
          get(|| async {
            Json(json!([
              { "lesson_id": 1, "grammars": [], "vocabs": [], "exams": [] },
              { "lesson_id": "not-a-number" },
              { "lesson_id": 3 }
            ]))
          }),
        )
        .route("/difficulty/2/lessons", get(|| async { Json(json!({ "message": "nope" })) })),
    )
    .await;
    let c = client(&base);
    let ids: Vec<_> = c.lessons("1").await.into_iter().map(|l| l.lesson_id).collect();
    assert_eq!(ids, vec![Some(1), Some(3)]);
    assert!(c.lessons("2").await.is_empty());
  }

  #[tokio::test]
  async fn lesson_detail_fills_in_requested_id() {
    let base = serve(Router::new().route(
      "/difficulty/:d/lessons/:l",
      get(|Path((d, l)): Path<(String, String)>| async move {
        Json(json!({
          "difficulty_id": d,
          "grammars": [{ "grammarId": 1, "lessonId": l, "title": "t", "description": "d", "example": "e", "translation": "t", "type": "writing" }]
        }))
      }),
    ))
    .await;
    let raw = client(&base).lesson("2", "4").await.unwrap();
    assert_eq!(raw.lesson_id, Some(4));
    assert_eq!(raw.grammars.len(), 1);
    assert!(raw.vocabs.is_empty());
  }

  #[tokio::test]
  async fn lesson_detail_not_found_is_none() {
    let base = serve(Router::new()).await;
    assert!(client(&base).lesson("1", "99").await.is_none());
  }

  #[tokio::test]
  async fn vocabulary_passes_lesson_id_as_query() {
    let base = serve(Router::new().route(
      "/vocabulary",
      get(|Query(q): Query<HashMap<String, String>>| async move {
        let id = q.get("lessonId").cloned().unwrap_or_default();
        Json(json!([{ "vocabId": 1, "word": id, "meaning": "m", "context": "", "type": "new" }]))
      }),
    ))
    .await;
    let got = client(&base).vocabulary("42").await;
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].word, "42");
  }

  #[test]
  fn endpoint_encodes_segments_and_keeps_base_path() {
    let c = client("http://content.local/api/");
    let url = c.endpoint(&["difficulty", "a b/../c", "lessons"], None).unwrap();
    assert_eq!(url.as_str(), "http://content.local/api/difficulty/a%20b%2F..%2Fc/lessons");
    let url = c.endpoint(&["vocabulary"], Some(("lessonId", "7"))).unwrap();
    assert_eq!(url.as_str(), "http://content.local/api/vocabulary?lessonId=7");
  }
}
