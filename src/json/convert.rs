//! Purpose: Import `serde_json::Value` trees into reference-counted `Value` stores.
//! Exports: `From<&serde_json::Value>` and `From<serde_json::Value>` for `Value`.
//! Role: Interop seam for callers (and tests) that already hold serde_json documents.
//! Invariants: Every imported node gets a fresh store; nothing is shared with the source.
use serde_json::Value as JsonValue;

use crate::core::value::Value;

impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::new_null(),
            JsonValue::Bool(b) => Value::from_bool(*b),
            JsonValue::Number(n) => Value::from_number(n.as_f64().unwrap_or_default()),
            JsonValue::String(s) => Value::from_string(s),
            JsonValue::Array(items) => Value::from_elements(items.iter().map(Value::from)),
            JsonValue::Object(map) => {
                Value::from_entries(map.iter().map(|(key, item)| (key.clone(), Value::from(item))))
            }
        }
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::from(&json)
    }
}
