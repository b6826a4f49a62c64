//! Normalized, UI-ready models: difficulties, lessons and their grammar,
//! vocabulary and exam records. Everything here is already validated; the
//! loosely typed backend shapes live in `wire`.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A proficiency tier (Beginner, Intermediate, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difficulty {
  pub id: String,
  pub title: String,
  pub description: String,
  pub lesson_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
  /// `lesson-{difficultyId}-{lessonId}`
  pub id: String,
  pub number: i64,
  pub title: String,
  pub grammar: Vec<Grammar>,
  pub vocabulary: Vec<Vocabulary>,
  pub exams: Vec<Exam>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grammar {
  pub id: String,
  pub title: String,
  pub description: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description_korean: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description_english: Option<String>,
  pub examples: Vec<String>,
  pub translations: Vec<String>,
  // Single-value fields kept for older views that show one example.
  pub example: String,
  pub translation: String,
  #[serde(rename = "type")]
  pub kind: GrammarType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
  pub id: String,
  pub word: String,
  pub meaning: String,
  pub context: String,
  #[serde(rename = "type")]
  pub kind: VocabType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
  pub id: String,
  pub question: String,
  pub options: Vec<String>,
  /// Zero-based index into `options`; `None` when the backend value was unusable.
  pub correct_answer: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarType {
  Writing,
  Speaking,
  Common,
}

impl GrammarType {
  /// Exact, case-sensitive match against the backend's labels.
  /// Anything else (including "Writing") becomes `Common`.
  pub fn validate(raw: &str) -> Self {
    match raw {
      "writing" => GrammarType::Writing,
      "speaking" => GrammarType::Speaking,
      "common" => GrammarType::Common,
      other => {
        debug!(target: "lessons", label = %other, "Unrecognized grammar type; using common");
        GrammarType::Common
      }
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabType {
  Important,
  Common,
  New,
}

impl VocabType {
  /// Case-insensitive mapping of the backend's free-text labels.
  pub fn classify(raw: &str) -> Self {
    match raw.to_lowercase().as_str() {
      "important" | "top 100" => VocabType::Important,
      "rarely use" | "new" => VocabType::New,
      "common" => VocabType::Common,
      other => {
        debug!(target: "lessons", label = %other, "Unrecognized vocabulary type; using common");
        VocabType::Common
      }
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      VocabType::Important => "important",
      VocabType::Common => "common",
      VocabType::New => "new",
    }
  }
}
