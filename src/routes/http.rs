//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.
//!
//! List endpoints answer `[]` whether the backend is empty or down; single-lesson
//! endpoints answer 404 with a generic "failed to load" message in both cases.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;
use crate::study::{flashcards, grade_exam, summary};

fn lesson_not_found() -> Response {
  (StatusCode::NOT_FOUND, Json(MessageOut { message: "Failed to load lesson data".into() })).into_response()
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut {
    ok: true,
    backend_url: state.config.backend_url.clone(),
    chat_enabled: state.chat.is_some(),
  })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_difficulties(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let difficulties = load_difficulties(&state).await;
  info!(target: "lessons", count = difficulties.len(), "HTTP difficulties served");
  Json(difficulties)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_level(
  State(state): State<Arc<AppState>>,
  Path(difficulty_id): Path<String>,
) -> Response {
  match load_level(&state, &difficulty_id).await {
    Some(level) => Json(level).into_response(),
    None => (StatusCode::NOT_FOUND, Json(MessageOut { message: "Failed to load level".into() })).into_response(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lessons(
  State(state): State<Arc<AppState>>,
  Path(difficulty_id): Path<String>,
) -> impl IntoResponse {
  Json(load_lessons(&state, &difficulty_id).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lesson(
  State(state): State<Arc<AppState>>,
  Path((difficulty_id, lesson_id)): Path<(String, String)>,
) -> Response {
  match load_lesson(&state, &difficulty_id, &lesson_id).await {
    Some(lesson) => Json(lesson).into_response(),
    None => lesson_not_found(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_flashcards(
  State(state): State<Arc<AppState>>,
  Path((difficulty_id, lesson_id)): Path<(String, String)>,
) -> Response {
  match load_lesson(&state, &difficulty_id, &lesson_id).await {
    Some(lesson) => Json(flashcards(&lesson)).into_response(),
    None => lesson_not_found(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_summary(
  State(state): State<Arc<AppState>>,
  Path((difficulty_id, lesson_id)): Path<(String, String)>,
) -> Response {
  match load_lesson(&state, &difficulty_id, &lesson_id).await {
    Some(lesson) => Json(summary(&lesson)).into_response(),
    None => lesson_not_found(),
  }
}

#[instrument(level = "info", skip(state, body), fields(answers = body.answers.len()))]
pub async fn http_post_exam(
  State(state): State<Arc<AppState>>,
  Path((difficulty_id, lesson_id)): Path<(String, String)>,
  Json(body): Json<ExamIn>,
) -> Response {
  let Some(lesson) = load_lesson(&state, &difficulty_id, &lesson_id).await else {
    return lesson_not_found();
  };
  let result = grade_exam(&lesson.exams, &body.answers);
  info!(target: "lessons", id = %lesson.id, score = result.score, gradable = result.gradable, total = result.total, "HTTP exam graded");
  Json(result).into_response()
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_vocabulary(
  State(state): State<Arc<AppState>>,
  Path(lesson_id): Path<String>,
) -> impl IntoResponse {
  Json(load_vocabulary(&state, &lesson_id).await)
}

#[instrument(level = "info", skip(state, body), fields(message_count = body.messages.len()))]
pub async fn http_post_chat(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChatIn>,
) -> Response {
  match chat_reply(&state, body.messages).await {
    Ok(reply) => Json(ChatOut { reply }).into_response(),
    Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorOut { error: e.to_string() })).into_response(),
  }
}
