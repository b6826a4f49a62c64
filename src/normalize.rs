//! Lesson normalization: raw content-API records in, UI-ready records out.
//!
//! Every function here is pure. The same raw input always produces the same
//! output, and no record is ever dropped: bad encodings degrade to raw text,
//! unknown labels degrade to the neutral bucket.

use tracing::warn;

use crate::decode::decode_string_array;
use crate::domain::{Difficulty, Exam, Grammar, GrammarType, Lesson, VocabType, Vocabulary};
use crate::wire::{RawDifficulty, RawExam, RawGrammar, RawLesson, RawVocab};

pub fn normalize_difficulty(raw: &RawDifficulty) -> Difficulty {
  Difficulty {
    id: raw.difficulty_id.to_string(),
    title: raw.name.clone(),
    description: raw.description.clone(),
    lesson_count: raw.lesson_count,
  }
}

/// Build one `Lesson` for the difficulty it was fetched under. The lesson id
/// is passed in resolved; raw payloads do not always carry one.
pub fn normalize_lesson(raw: &RawLesson, difficulty_id: &str, lesson_id: i64) -> Lesson {
  Lesson {
    id: format!("lesson-{difficulty_id}-{lesson_id}"),
    number: lesson_id,
    title: format!("Lesson {lesson_id}"),
    grammar: raw.grammars.iter().map(normalize_grammar).collect(),
    vocabulary: raw.vocabs.iter().map(normalize_vocab).collect(),
    exams: raw.exams.iter().map(normalize_exam).collect(),
  }
}

/// Normalize a lesson list. Elements without a lesson id are skipped: there is
/// no request to take one from, and a made-up id would collide.
pub fn normalize_lessons(raws: &[RawLesson], difficulty_id: &str) -> Vec<Lesson> {
  raws
    .iter()
    .enumerate()
    .filter_map(|(idx, raw)| match raw.lesson_id {
      Some(lesson_id) => Some(normalize_lesson(raw, difficulty_id, lesson_id)),
      None => {
        warn!(target: "lessons", %difficulty_id, idx, "Skipping lesson without an id");
        None
      }
    })
    .collect()
}

pub fn normalize_grammar(raw: &RawGrammar) -> Grammar {
  let descriptions = decode_string_array(&raw.description).into_vec();
  let examples = decode_string_array(&raw.example).into_vec();
  let translations = decode_string_array(&raw.translation).into_vec();

  Grammar {
    id: format!("grammar-{}", raw.grammar_id),
    title: raw.title.clone(),
    description: first_or(&descriptions, &raw.description),
    description_korean: descriptions.first().cloned(),
    description_english: descriptions.get(1).cloned(),
    example: first_or(&examples, &raw.example),
    translation: first_or(&translations, &raw.translation),
    examples,
    translations,
    kind: GrammarType::validate(&raw.kind),
  }
}

pub fn normalize_vocab(raw: &RawVocab) -> Vocabulary {
  Vocabulary {
    id: format!("vocab-{}", raw.vocab_id),
    word: raw.word.clone(),
    meaning: raw.meaning.clone(),
    context: raw.context.clone(),
    kind: VocabType::classify(&raw.kind),
  }
}

pub fn normalize_exam(raw: &RawExam) -> Exam {
  let options = decode_string_array(&raw.options).into_vec();
  let correct_answer = parse_correct_answer(&raw.correct_answer, options.len());
  if correct_answer.is_none() {
    warn!(
      target: "lessons",
      exam_id = raw.exam_id,
      correct_answer = %raw.correct_answer,
      options = options.len(),
      "Exam has no usable correct answer"
    );
  }
  Exam {
    id: format!("exam-{}", raw.exam_id),
    question: raw.question.clone(),
    options,
    correct_answer,
  }
}

/// Base-10 index, surrounding whitespace ignored. `None` if not a number or
/// not a valid index into the options.
fn parse_correct_answer(raw: &str, option_count: usize) -> Option<usize> {
  raw.trim().parse::<usize>().ok().filter(|idx| *idx < option_count)
}

fn first_or(items: &[String], raw: &str) -> String {
  items.first().cloned().unwrap_or_else(|| raw.to_string())
}
