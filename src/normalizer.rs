//! Payload Normalizer
//!
//! Turns a raw request body into a `NormalizedRequest` ready for rendering.
//! The payload is deliberately multi-shape: callers send `content` as either a
//! JSON object or a JSON-encoded string, and some clients wrap the whole body
//! in an outer JSON string. Normalization is a bounded state machine: at most
//! one string-to-object unwrap at the top level, at most one decode retry
//! (after link sanitization) for string content.
//!
//! Nested data is handled tolerantly. A non-string bullet or a number where a
//! section body was expected never fails the request; only the four
//! `NormalizeError` variants abort, and all of them mean no document can be
//! produced at all.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::sanitizer::sanitize;

const DEFAULT_STUDENT_NAME: &str = "Student";
const DEFAULT_TITLE: &str = "Untitled Project";

/// Errors that prevent producing any document. Each maps to HTTP 400.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("request body is not a JSON object")]
    MalformedTopLevelPayload,

    #[error("content must be a JSON object or a JSON-encoded string")]
    InvalidContentType,

    #[error("content string is not valid JSON")]
    MalformedContentPayload,

    #[error("decoded content is not a JSON object")]
    ContentNotAnObject,
}

/// One section body of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// Rendered as a single paragraph.
    PlainText(String),
    /// `text`-prefixed fields (ascending key order) joined into one paragraph,
    /// plus an optional bullet list. Both may be empty (heading-only section).
    Structured {
        text_fields: Vec<(String, String)>,
        bullets: Vec<String>,
    },
}

/// Normalized form of the request payload.
///
/// `content` preserves the iteration order of the payload's content mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub student_name: String,
    pub title: String,
    pub content: Vec<(String, Section)>,
}

/// Parse and normalize a raw request body.
pub fn normalize(raw_body: &[u8]) -> Result<NormalizedRequest, NormalizeError> {
    let parsed: Value = serde_json::from_slice(raw_body)
        .map_err(|_| NormalizeError::MalformedTopLevelPayload)?;

    // At most one unwrap for clients that double-encode the whole body.
    let top = match parsed {
        Value::String(inner) => {
            tracing::debug!("top-level payload is a JSON string, unwrapping once");
            serde_json::from_str(&inner).map_err(|_| NormalizeError::MalformedTopLevelPayload)?
        }
        other => other,
    };

    let obj = match top {
        Value::Object(map) => map,
        _ => return Err(NormalizeError::MalformedTopLevelPayload),
    };

    let student_name = field_text(&obj, "student_name", DEFAULT_STUDENT_NAME);
    let title = field_text(&obj, "title", DEFAULT_TITLE);

    let content_map = match obj.get("content") {
        None => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(encoded)) => decode_content_string(encoded)?,
        Some(other) => {
            tracing::warn!("content has unsupported type {}", type_name(other));
            return Err(NormalizeError::InvalidContentType);
        }
    };

    let content = content_map
        .into_iter()
        .map(|(name, body)| {
            let section = classify_section(&name, body);
            (name, section)
        })
        .collect();

    Ok(NormalizedRequest {
        student_name,
        title,
        content,
    })
}

/// Extract a header field. Present-but-non-string values keep their literal
/// JSON text representation rather than being coerced.
fn field_text(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

/// Decode string-form content: verbatim first, then once more after stripping
/// embedded links that may have broken the encoding.
fn decode_content_string(encoded: &str) -> Result<Map<String, Value>, NormalizeError> {
    let decoded: Value = match serde_json::from_str(encoded) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!("content string failed to decode ({}), retrying after sanitization", err);
            serde_json::from_str(&sanitize(encoded))
                .map_err(|_| NormalizeError::MalformedContentPayload)?
        }
    };

    match decoded {
        Value::Object(map) => Ok(map),
        other => {
            tracing::warn!("decoded content is {} rather than an object", type_name(&other));
            Err(NormalizeError::ContentNotAnObject)
        }
    }
}

/// Classify one content entry. String bodies become `PlainText`; objects
/// become `Structured`; anything else becomes an empty `Structured` so the
/// heading is still emitted.
fn classify_section(name: &str, body: Value) -> Section {
    match body {
        Value::String(text) => Section::PlainText(text),
        Value::Object(map) => {
            let mut text_fields: Vec<(String, String)> = map
                .iter()
                .filter(|(key, _)| key.starts_with("text"))
                .filter_map(|(key, value)| match value {
                    Value::String(s) => Some((key.clone(), s.clone())),
                    _ => {
                        tracing::debug!("section '{}': skipping non-string field '{}'", name, key);
                        None
                    }
                })
                .collect();
            text_fields.sort_by(|a, b| a.0.cmp(&b.0));

            let bullets = match map.get("bullets") {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            };

            Section::Structured {
                text_fields,
                bullets,
            }
        }
        other => {
            tracing::debug!(
                "section '{}': body is {} and not renderable, emitting heading only",
                name,
                type_name(&other)
            );
            Section::Structured {
                text_fields: Vec::new(),
                bullets: Vec::new(),
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
