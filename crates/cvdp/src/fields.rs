//! Tolerant field access for loosely shaped records.
//!
//! Absent keys and values of the wrong JSON type read as the empty default
//! instead of failing. Non-object parents behave like an empty object.

use serde_json::{Map, Value};

use std::sync::OnceLock;

static EMPTY_MAP: OnceLock<Map<String, Value>> = OnceLock::new();

fn empty_map() -> &'static Map<String, Value> {
    EMPTY_MAP.get_or_init(Map::new)
}

/// String field, or `""`.
pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Object field, or an empty map.
pub fn map_field<'a>(value: &'a Value, key: &str) -> &'a Map<String, Value> {
    value
        .get(key)
        .and_then(Value::as_object)
        .unwrap_or(empty_map())
}

/// Array field, or an empty slice.
pub fn list_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrong_types_read_as_defaults() {
        let v = json!({ "s": 5, "m": "nope", "l": { "a": 1 } });
        assert_eq!(str_field(&v, "s"), "");
        assert!(map_field(&v, "m").is_empty());
        assert!(list_field(&v, "l").is_empty());
    }

    #[test]
    fn test_missing_keys_and_non_object_parent() {
        let v = json!(["not", "an", "object"]);
        assert_eq!(str_field(&v, "id"), "");
        assert!(map_field(&v, "context").is_empty());
        assert!(list_field(&v, "categories").is_empty());
    }

    #[test]
    fn test_present_values_pass_through() {
        let v = json!({ "s": "hi", "m": { "a": "b" }, "l": ["x", "y"] });
        assert_eq!(str_field(&v, "s"), "hi");
        assert_eq!(map_field(&v, "m").len(), 1);
        assert_eq!(list_field(&v, "l").len(), 2);
    }
}
