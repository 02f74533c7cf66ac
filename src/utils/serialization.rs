// src/utils/serialization.rs
//! Helpers for the JSON documents exchanged with the Crypto Engine.

use serde_json::Value;

/// Parses `text` as structured JSON data.
///
/// # Returns
/// - `Some(value)` when `text` is a JSON object or array
/// - `None` for anything else, including bare scalars such as `42` or `"x"`
///
/// # Note
/// Engine output for the keygen and blind-request steps must be structured;
/// a scalar there means the script did not produce what the protocol needs.
pub fn parse_structured(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Whether `text` is structured JSON data (see [`parse_structured`]).
pub fn is_structured(text: &str) -> bool {
    parse_structured(text).is_some()
}
