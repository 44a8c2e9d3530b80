//! Canonical form for JSON documents used in fingerprinting.
//!
//! The normalization rule: object keys are recursively sorted, array order is
//! preserved. Predicate and projection key order is therefore never
//! significant, while ordered structures (aggregation pipelines, `$in` lists)
//! keep their meaning. This must hold regardless of how the `serde_json::Map`
//! backing store happens to order entries, so the sort is explicit rather
//! than an artifact of the serializer.

use serde_json::{Map, Value};

/// Rebuild a JSON value with all object keys recursively sorted.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, nested) in entries {
                sorted.insert(key.clone(), canonicalize(nested));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        scalar => scalar.clone(),
    }
}

/// Serialize a value to its canonical textual form.
pub fn canonical_string(value: &Value) -> String {
    canonicalize(value).to_string()
}

// =============================================================================
// TESTS
// =============================================================================
