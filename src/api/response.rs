//! Interprets raw backend payloads.
//!
//! The prediction service reports failures in-band: a well-formed JSON body
//! containing an `error` field, regardless of HTTP status. That field wins
//! over anything else in the payload, including partial data next to it.

use super::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Turn a raw reply into the typed record `T`, or the error the service
/// embedded in it.
pub fn decode<T: DeserializeOwned>(raw: Value) -> Result<T, ApiError> {
    if let Some(message) = find_error(&raw) {
        return Err(ApiError::Backend(message.to_string()));
    }
    Ok(serde_json::from_value(raw)?)
}

/// Depth-first scan for a string `error` field at any nesting level.
fn find_error(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(message)) = map.get("error") {
                return Some(message);
            }
            map.values().find_map(find_error)
        }
        Value::Array(items) => items.iter().find_map(find_error),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
