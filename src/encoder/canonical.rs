//! Canonical JSON for amino sign documents
//!
//! A sign doc must serialize to the exact byte sequence every other
//! implementation produces: object keys sorted lexicographically at
//! every depth, arrays in order, no insignificant whitespace.

use crate::errors::UndResult;
use serde_json::{Map, Value};

/// Recursively sort object keys; arrays keep their order
pub fn deep_sort(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (key, val) in entries {
                sorted.insert(key.clone(), deep_sort(val));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(deep_sort).collect()),
        other => other.clone(),
    }
}

/// Serialize a JSON value to canonical sign bytes
pub fn convert_object_to_sign_bytes(value: &Value) -> UndResult<Vec<u8>> {
    Ok(serde_json::to_vec(&deep_sort(value))?)
}
