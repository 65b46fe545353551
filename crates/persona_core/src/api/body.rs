//! Response body interpretation.
//!
//! # Responsibility
//! - Parse a raw response body once: empty, JSON, or plain text.
//! - Extract the optional server `message` used for user-facing errors.
//!
//! # Invariants
//! - A non-JSON body is treated as its own message.
//! - Failure reasons never exceed the configured preview bound.

use serde_json::Value;

/// Parsed form of one response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parses `raw` as JSON, falling back to plain text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(raw.to_string()),
        }
    }

    /// Server-supplied message, if any.
    ///
    /// - JSON object: its non-empty `message` field (strings verbatim, other
    ///   values as compact JSON).
    /// - Plain text: the whole body.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(text) => Some(text.clone()),
            Self::Json(Value::Object(map)) => match map.get("message") {
                Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
                Some(Value::Null) | Some(Value::String(_)) | None => None,
                Some(other) => Some(other.to_string()),
            },
            Self::Json(_) => None,
        }
    }
}

/// `Error HTTP: <status>`, the reason used when nothing better is known.
pub fn http_status_reason(status: u16) -> String {
    format!("Error HTTP: {status}")
}

/// Reason for a failed response: server message, else status text.
pub fn failure_reason(status: u16, raw: &str, limit: usize) -> String {
    ResponseBody::parse(raw)
        .message()
        .map(|message| truncate_chars(&message, limit))
        .unwrap_or_else(|| http_status_reason(status))
}

/// Keeps at most `limit` characters of `value`.
pub fn truncate_chars(value: &str, limit: usize) -> String {
    value.chars().take(limit).collect()
}
