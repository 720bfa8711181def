//! # Reply JSON Utilities
//!
//! LLM replies are supposed to be bare JSON but often arrive wrapped in
//! markdown code fences, or as an object where an array was asked for.
//! These helpers absorb both before any field mapping happens.

use serde_json::Value;

/// Strip a leading ```/```json line and the matching trailing fence.
/// Unfenced text passes through untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if text.starts_with("```") {
        text = text.split_once('\n').map_or("", |(_, rest)| rest);
        if text.trim_end().ends_with("```") {
            if let Some(idx) = text.rfind("```") {
                text = &text[..idx];
            }
        }
        text = text.trim();
    }
    text
}

/// Accept either a bare array or an object carrying a "projects" array;
/// anything else yields no entries.
pub fn coerce_project_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("projects") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// String field with empty-string default
pub fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// String-array field; non-string elements are skipped
pub fn str_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_fences_variants() {
        assert_eq!(strip_code_fences("[1, 2]"), "[1, 2]");
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        // Missing trailing fence: keep the body
        assert_eq!(strip_code_fences("```json\n[1]"), "[1]");
    }

    #[test]
    fn test_coerce_project_array() {
        assert_eq!(coerce_project_array(json!([1, 2])).len(), 2);
        assert_eq!(
            coerce_project_array(json!({"projects": [{"title": "a"}]})).len(),
            1
        );
        assert!(coerce_project_array(json!({"other": []})).is_empty());
        assert!(coerce_project_array(json!("just text")).is_empty());
    }

    #[test]
    fn test_field_helpers() {
        let v = json!({"title": "Lamp", "steps": ["a", "b", 3], "n": 5});
        assert_eq!(str_field(&v, "title"), "Lamp");
        assert_eq!(str_field(&v, "missing"), "");
        assert_eq!(str_field(&v, "n"), "");
        assert_eq!(str_list(&v, "steps"), vec!["a", "b"]);
        assert!(str_list(&v, "missing").is_empty());
    }
}
