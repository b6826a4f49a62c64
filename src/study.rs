//! Study views built on top of normalized lessons: the level overview,
//! flashcards, the lesson summary and exam grading.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, Exam, Lesson};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyLevel {
  pub title: String,
  pub description: String,
  pub lessons: Vec<Lesson>,
}

/// Pair a difficulty with its lessons. `None` if `difficulty_id` is not listed.
pub fn study_level(difficulties: &[Difficulty], difficulty_id: &str, lessons: Vec<Lesson>) -> Option<StudyLevel> {
  let difficulty = difficulties.iter().find(|d| d.id == difficulty_id)?;
  Some(StudyLevel {
    title: difficulty.title.clone(),
    description: difficulty.description.clone(),
    lessons,
  })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
  pub id: String,
  pub front: String,
  pub back: String,
}

/// Vocabulary cards first, then grammar cards, both in lesson order.
pub fn flashcards(lesson: &Lesson) -> Vec<Flashcard> {
  let vocab = lesson.vocabulary.iter().map(|v| Flashcard {
    id: format!("card-{}", v.id),
    front: v.word.clone(),
    back: v.meaning.clone(),
  });
  let grammar = lesson.grammar.iter().map(|g| Flashcard {
    id: format!("card-{}", g.id),
    front: g.title.clone(),
    back: g.description.clone(),
  });
  vocab.chain(grammar).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySection {
  pub id: String,
  pub title: String,
  pub content: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
  pub lesson_id: String,
  pub sections: Vec<SummarySection>,
  /// Keyed by vocabulary type label; types with no words are omitted.
  pub vocabulary_counts: BTreeMap<String, usize>,
  pub exam_count: usize,
}

pub fn summary(lesson: &Lesson) -> LessonSummary {
  let grammar_points = lesson.grammar.iter().map(|g| g.title.clone()).collect();

  // Important words lead; the sort is stable so lesson order holds within a type.
  let mut vocab: Vec<_> = lesson.vocabulary.iter().collect();
  vocab.sort_by_key(|v| v.kind);
  let words = vocab.iter().map(|v| v.word.clone()).collect();

  let mut vocabulary_counts = BTreeMap::new();
  for v in &lesson.vocabulary {
    *vocabulary_counts.entry(v.kind.as_str().to_string()).or_insert(0) += 1;
  }

  LessonSummary {
    lesson_id: lesson.id.clone(),
    sections: vec![
      SummarySection { id: "grammar".into(), title: "Key Grammar Points".into(), content: grammar_points },
      SummarySection { id: "vocabulary".into(), title: "Essential Vocabulary".into(), content: words },
    ],
    vocabulary_counts,
    exam_count: lesson.exams.len(),
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamOutcome {
  pub exam_id: String,
  pub chosen: Option<usize>,
  pub correct_answer: Option<usize>,
  pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
  pub score: usize,
  /// Exams that have a usable correct answer.
  pub gradable: usize,
  pub total: usize,
  pub outcomes: Vec<ExamOutcome>,
}

/// Grade chosen option indices (keyed by exam id) against the lesson's exams.
/// Unanswered exams count as wrong; exams without a correct answer never score.
pub fn grade_exam(exams: &[Exam], answers: &HashMap<String, usize>) -> ExamResult {
  let outcomes: Vec<ExamOutcome> = exams
    .iter()
    .map(|exam| {
      let chosen = answers.get(&exam.id).copied();
      ExamOutcome {
        exam_id: exam.id.clone(),
        chosen,
        correct_answer: exam.correct_answer,
        correct: exam.correct_answer.is_some() && chosen == exam.correct_answer,
      }
    })
    .collect();

  ExamResult {
    score: outcomes.iter().filter(|o| o.correct).count(),
    gradable: exams.iter().filter(|e| e.correct_answer.is_some()).count(),
    total: exams.len(),
    outcomes,
  }
}
