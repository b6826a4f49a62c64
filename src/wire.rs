//! Boundary adapter for the content API's wire shapes.
//!
//! The list endpoints speak snake_case (`lesson_id`, `grammar_id`) while the
//! detail endpoints speak camelCase (`lessonId`, `grammarId`). Both are accepted
//! here and nowhere else. Missing collections become empty, missing or null text
//! becomes `""`, and ids may arrive as numbers or decimal strings.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

#[derive(Clone, Debug, Deserialize)]
pub struct RawDifficulty {
  #[serde(rename = "difficultyId", alias = "difficulty_id", deserialize_with = "id")]
  pub difficulty_id: i64,
  #[serde(default, deserialize_with = "text")]
  pub name: String,
  #[serde(default, deserialize_with = "text")]
  pub description: String,
  #[serde(rename = "lessonCount", alias = "lesson_count", default, deserialize_with = "count")]
  pub lesson_count: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(from = "LessonFields")]
pub struct RawLesson {
  /// Absent on some detail payloads; the caller knows which lesson it asked for.
  pub lesson_id: Option<i64>,
  pub grammars: Vec<RawGrammar>,
  pub vocabs: Vec<RawVocab>,
  pub exams: Vec<RawExam>,
}

/// Both id spellings are separate fields so a payload carrying both still
/// parses. The snake_case one wins.
#[derive(Deserialize)]
struct LessonFields {
  #[serde(default, deserialize_with = "opt_id")]
  lesson_id: Option<i64>,
  #[serde(rename = "lessonId", default, deserialize_with = "opt_id")]
  lesson_id_camel: Option<i64>,
  #[serde(default, deserialize_with = "list")]
  grammars: Vec<RawGrammar>,
  #[serde(default, deserialize_with = "list")]
  vocabs: Vec<RawVocab>,
  #[serde(default, deserialize_with = "list")]
  exams: Vec<RawExam>,
}

impl From<LessonFields> for RawLesson {
  fn from(f: LessonFields) -> Self {
    Self {
      lesson_id: f.lesson_id.or(f.lesson_id_camel),
      grammars: f.grammars,
      vocabs: f.vocabs,
      exams: f.exams,
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawGrammar {
  #[serde(rename = "grammarId", alias = "grammar_id", deserialize_with = "id")]
  pub grammar_id: i64,
  #[serde(default, deserialize_with = "text")]
  pub title: String,
  #[serde(default, deserialize_with = "text")]
  pub description: String,
  #[serde(default, deserialize_with = "text")]
  pub example: String,
  #[serde(default, deserialize_with = "text")]
  pub translation: String,
  #[serde(rename = "type", default, deserialize_with = "text")]
  pub kind: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawVocab {
  #[serde(rename = "vocabId", alias = "vocab_id", deserialize_with = "id")]
  pub vocab_id: i64,
  #[serde(default, deserialize_with = "text")]
  pub word: String,
  #[serde(default, deserialize_with = "text")]
  pub meaning: String,
  #[serde(default, deserialize_with = "text")]
  pub context: String,
  #[serde(rename = "type", default, deserialize_with = "text")]
  pub kind: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawExam {
  #[serde(rename = "examId", alias = "exam_id", deserialize_with = "id")]
  pub exam_id: i64,
  #[serde(default, deserialize_with = "text")]
  pub question: String,
  /// JSON-encoded array of answer strings.
  #[serde(default, deserialize_with = "text")]
  pub options: String,
  /// Decimal index into `options`, as text.
  #[serde(rename = "correctAnswer", alias = "correct_answer", default, deserialize_with = "text")]
  pub correct_answer: String,
}

fn value_to_id<E: de::Error>(v: Value) -> Result<i64, E> {
  match v {
    Value::Number(n) => n.as_i64().ok_or_else(|| E::custom(format!("id is not an integer: {n}"))),
    Value::String(s) => s.trim().parse::<i64>().map_err(|e| E::custom(format!("id {s:?}: {e}"))),
    other => Err(E::custom(format!("expected integer id, got {other}"))),
  }
}

fn id<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
  value_to_id(Value::deserialize(d)?)
}

fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
  match Value::deserialize(d)? {
    Value::Null => Ok(None),
    v => value_to_id(v).map(Some),
  }
}

/// Non-negative count: null, negative or unparseable values are 0.
fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
  let n = match Value::deserialize(d)? {
    Value::Number(n) => n.as_u64(),
    Value::String(s) => s.trim().parse::<u64>().ok(),
    _ => None,
  };
  Ok(n.and_then(|n| u32::try_from(n).ok()).unwrap_or(0))
}

/// String-ish field: null is empty, numbers and bools keep their JSON text.
fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
  Ok(match Value::deserialize(d)? {
    Value::Null => String::new(),
    Value::String(s) => s,
    other => other.to_string(),
  })
}

/// A collection that may be null.
fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn detail_payload_uses_camel_case() {
    let raw: RawLesson = serde_json::from_value(json!({
      "difficulty_id": 1,
      "lessonId": 4,
      "grammars": [{
        "grammarId": 9, "lessonId": 4, "title": "~아요/어요",
        "description": "polite ending", "example": "먹어요",
        "translation": "I eat", "type": "speaking"
      }],
      "vocabs": [{ "vocabId": 2, "lessonId": 4, "word": "물", "meaning": "water", "context": "", "type": "new" }],
      "exams": [{ "examId": 3, "lessonId": 4, "question": "?", "options": "[\"a\"]", "correctAnswer": "0" }]
    }))
    .unwrap();
    assert_eq!(raw.lesson_id, Some(4));
    assert_eq!(raw.grammars[0].grammar_id, 9);
    assert_eq!(raw.grammars[0].kind, "speaking");
    assert_eq!(raw.vocabs[0].vocab_id, 2);
    assert_eq!(raw.exams[0].correct_answer, "0");
  }

  #[test]
  fn list_payload_uses_snake_case() {
    let raw: RawLesson = serde_json::from_value(json!({
      "lesson_id": 7,
      "grammars": [{ "grammar_id": 1, "title": "t", "description": "d", "example": "e", "translation": "tr", "type": "writing" }],
      "vocabs": [{ "vocab_id": 5, "word": "책", "meaning": "book", "context": "c", "type": "top 100" }],
      "exams": [{ "exam_id": 8, "question": "q", "options": "[]", "correct_answer": "2" }]
    }))
    .unwrap();
    assert_eq!(raw.lesson_id, Some(7));
    assert_eq!(raw.grammars[0].grammar_id, 1);
    assert_eq!(raw.vocabs[0].vocab_id, 5);
    assert_eq!(raw.exams[0].exam_id, 8);
    assert_eq!(raw.exams[0].correct_answer, "2");
  }

  #[test]
  fn missing_or_null_collections_are_empty() {
    let raw: RawLesson = serde_json::from_value(json!({ "lesson_id": 1, "vocabs": null })).unwrap();
    assert!(raw.grammars.is_empty());
    assert!(raw.vocabs.is_empty());
    assert!(raw.exams.is_empty());
  }

  #[test]
  fn ids_accept_numeric_strings_and_text_accepts_numbers() {
    let exam: RawExam = serde_json::from_value(json!({
      "examId": "12", "question": null, "options": "[\"x\",\"y\"]", "correctAnswer": 1
    }))
    .unwrap();
    assert_eq!(exam.exam_id, 12);
    assert_eq!(exam.question, "");
    assert_eq!(exam.correct_answer, "1");
  }

  #[test]
  fn non_numeric_id_is_rejected() {
    let res = serde_json::from_value::<RawVocab>(json!({ "vocabId": "abc", "word": "x" }));
    assert!(res.is_err());
  }

  #[test]
  fn difficulty_accepts_both_conventions() {
    let a: RawDifficulty = serde_json::from_value(json!({
      "difficultyId": 1, "name": "Beginner", "description": "basics", "lessonCount": 3
    }))
    .unwrap();
    let b: RawDifficulty = serde_json::from_value(json!({
      "difficulty_id": 1, "name": "Beginner", "description": "basics", "lesson_count": 3
    }))
    .unwrap();
    assert_eq!(a.difficulty_id, b.difficulty_id);
    assert_eq!(a.lesson_count, 3);
    assert_eq!(b.lesson_count, 3);
  }

  #[test]
  fn lesson_count_is_lenient() {
    let cases = [
      (json!(null), 0),
      (json!("7"), 7),
      (json!(" 4 "), 4),
      (json!("many"), 0),
      (json!(-2), 0),
      (json!(2.5), 0),
    ];
    for (value, expected) in cases {
      let raw: RawDifficulty = serde_json::from_value(json!({
        "difficultyId": 1, "name": "Beginner", "description": "basics", "lessonCount": value
      }))
      .unwrap();
      assert_eq!(raw.lesson_count, expected, "{value}");
    }
    let missing: RawDifficulty = serde_json::from_value(json!({ "difficulty_id": 2 })).unwrap();
    assert_eq!(missing.lesson_count, 0);
  }

  #[test]
  fn lesson_with_both_id_spellings_parses() {
    let raw: RawLesson = serde_json::from_value(json!({ "lesson_id": 5, "lessonId": 6, "vocabs": [] })).unwrap();
    assert_eq!(raw.lesson_id, Some(5));
    let raw: RawLesson = serde_json::from_value(json!({ "lesson_id": null, "lessonId": "6" })).unwrap();
    assert_eq!(raw.lesson_id, Some(6));
  }
}
