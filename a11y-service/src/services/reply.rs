//! Lenient accessors for model-generated JSON.
//!
//! Model replies are untrusted: fields may be missing, empty or the wrong
//! type. These helpers treat all of those as absent.

use serde_json::Value;

/// Non-empty string (or number) at `key`.
pub fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `text` with an empty-string fallback.
pub fn text_or_empty(value: &Value, key: &str) -> String {
    text(value, key).unwrap_or_default()
}

/// String elements of the array at `key`. Non-strings are skipped.
pub fn string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    value.get(key)?.as_array().map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}

/// Elements of the array at `key`, or an empty slice.
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn flag(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_and_mistyped_fields_are_absent() {
        let value = json!({ "a": "", "b": null, "c": 3, "d": "x", "e": [1, "y"], "f": "true" });

        assert_eq!(text(&value, "a"), None);
        assert_eq!(text(&value, "b"), None);
        assert_eq!(text(&value, "c").as_deref(), Some("3"));
        assert_eq!(text(&value, "d").as_deref(), Some("x"));
        assert_eq!(string_list(&value, "e"), Some(vec!["y".to_string()]));
        assert_eq!(string_list(&value, "d"), None);
        assert!(array(&value, "missing").is_empty());
        assert!(!flag(&value, "f"));
    }
}
