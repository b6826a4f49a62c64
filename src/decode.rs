//! Permissive decoding of string fields that the content API sometimes
//! double-encodes as a JSON array (`["한국어","English"]`) and sometimes
//! leaves as plain text.

use serde_json::Value;
use tracing::debug;

/// Outcome of decoding one field. Both arms carry usable text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedField {
  /// The field was a JSON array; each element as a string.
  Decoded(Vec<String>),
  /// Not JSON, or JSON that is not an array: the untouched input.
  Fallback(String),
}

impl DecodedField {
  pub fn into_vec(self) -> Vec<String> {
    match self {
      DecodedField::Decoded(items) => items,
      DecodedField::Fallback(raw) => vec![raw],
    }
  }
}

/// Decode `raw` as a JSON array of strings. Total: never panics, never errors.
///
/// Non-string array elements are kept as their JSON text (`1` becomes `"1"`).
pub fn decode_string_array(raw: &str) -> DecodedField {
  match serde_json::from_str::<Value>(raw) {
    Ok(Value::Array(items)) => DecodedField::Decoded(items.into_iter().map(value_to_text).collect()),
    Ok(_) => DecodedField::Fallback(raw.to_string()),
    Err(e) => {
      debug!(target: "lessons", error = %e, len = raw.len(), "Field is not JSON; using raw text");
      DecodedField::Fallback(raw.to_string())
    }
  }
}

fn value_to_text(v: Value) -> String {
  match v {
    Value::String(s) => s,
    other => other.to_string(),
  }
}
