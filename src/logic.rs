//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Each one is fetch → normalize. Transport trouble has already been absorbed
//! by the content client, so these only ever see "data" or "no data".

use tracing::{error, info, instrument, warn};

use crate::chat::ChatMessage;
use crate::domain::{Difficulty, Lesson, Vocabulary};
use crate::error::ChatError;
use crate::normalize::{normalize_difficulty, normalize_lesson, normalize_lessons, normalize_vocab};
use crate::state::AppState;
use crate::study::{study_level, StudyLevel};

#[instrument(level = "info", skip(state))]
pub async fn load_difficulties(state: &AppState) -> Vec<Difficulty> {
  state.content.difficulties().await.iter().map(normalize_difficulty).collect()
}

#[instrument(level = "info", skip(state))]
pub async fn load_lessons(state: &AppState, difficulty_id: &str) -> Vec<Lesson> {
  let raws = state.content.lessons(difficulty_id).await;
  let lessons = normalize_lessons(&raws, difficulty_id);
  info!(target: "lessons", %difficulty_id, count = lessons.len(), "Lessons normalized");
  lessons
}

#[instrument(level = "info", skip(state))]
pub async fn load_lesson(state: &AppState, difficulty_id: &str, lesson_id: &str) -> Option<Lesson> {
  let raw = state.content.lesson(difficulty_id, lesson_id).await?;
  let Some(number) = raw.lesson_id else {
    warn!(target: "lessons", %difficulty_id, %lesson_id, "Lesson has no usable id");
    return None;
  };
  let lesson = normalize_lesson(&raw, difficulty_id, number);
  info!(
    target: "lessons",
    id = %lesson.id,
    grammar = lesson.grammar.len(),
    vocabulary = lesson.vocabulary.len(),
    exams = lesson.exams.len(),
    "Lesson normalized"
  );
  Some(lesson)
}

/// Difficulty metadata plus its lessons; both fetches run concurrently.
#[instrument(level = "info", skip(state))]
pub async fn load_level(state: &AppState, difficulty_id: &str) -> Option<StudyLevel> {
  let (difficulties, lessons) = tokio::join!(load_difficulties(state), load_lessons(state, difficulty_id));
  study_level(&difficulties, difficulty_id, lessons)
}

#[instrument(level = "info", skip(state))]
pub async fn load_vocabulary(state: &AppState, lesson_id: &str) -> Vec<Vocabulary> {
  state.content.vocabulary(lesson_id).await.iter().map(normalize_vocab).collect()
}

#[instrument(level = "info", skip(state, messages), fields(message_count = messages.len()))]
pub async fn chat_reply(state: &AppState, messages: Vec<ChatMessage>) -> Result<String, ChatError> {
  let Some(chat) = &state.chat else {
    error!(target: "chat", "Chat request rejected: OPENAI_API_KEY not set");
    return Err(ChatError::Disabled);
  };
  chat.complete(messages).await.map_err(|e| {
    error!(target: "chat", error = %e, "Chat completion failed");
    e
  })
}
