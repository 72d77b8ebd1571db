//! Recursive plain-text rendering of upstream JSON.

use serde_json::Value;

/// Placeholder rendered for `null`.
pub const MISSING: &str = "Missing";

/// Separator placed between list elements.
pub const DELIMITER: &str = "\n---\n";

/// Render a JSON value as plain text.
///
/// Objects render `Key: value` per entry in insertion order with the first
/// character of each key upper-cased. List elements are separated by
/// [`DELIMITER`]. Scalars are followed by `" \n"`.
pub fn format_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => write_scalar(out, MISSING),
        Value::Bool(b) => write_scalar(out, if *b { "true" } else { "false" }),
        Value::Number(n) => write_scalar(out, &n.to_string()),
        Value::String(s) => write_scalar(out, s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(DELIMITER);
                }
                write_value(out, item);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                out.push_str(&capitalize(key));
                out.push_str(": ");
                write_value(out, item);
            }
        }
    }
}

fn write_scalar(out: &mut String, text: &str) {
    out.push_str(text);
    out.push_str(" \n");
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_keep_order_and_are_capitalised() {
        let value = json!({"zeta": 1, "alpha": "two", "mid": true});
        assert_eq!(format_value(&value), "Zeta: 1 \nAlpha: two \nMid: true \n");
    }

    #[test]
    fn test_null_is_missing() {
        assert_eq!(format_value(&Value::Null), "Missing \n");
        assert_eq!(format_value(&json!({"author": null})), "Author: Missing \n");
    }

    #[test]
    fn test_list_delimiters() {
        let value = json!(["a", "b", "c", "d"]);
        let rendered = format_value(&value);
        assert_eq!(rendered.matches("---").count(), 3);
        assert_eq!(rendered, "a \n\n---\nb \n\n---\nc \n\n---\nd \n");

        assert_eq!(format_value(&json!([])), "");
        assert_eq!(format_value(&json!(["only"])).matches("---").count(), 0);
    }

    #[test]
    fn test_idempotent() {
        let value = json!({
            "meta": {"found": 2, "returned": 2},
            "data": [
                {"uuid": "1", "title": "First", "categories": ["tech", "science"]},
                {"uuid": "2", "title": null, "categories": []}
            ]
        });
        assert_eq!(format_value(&value), format_value(&value));
    }

    #[test]
    fn test_nested_structure() {
        let value = json!({"data": [{"title": "A"}, {"title": "B"}]});
        assert_eq!(format_value(&value), "Data: Title: A \n\n---\nTitle: B \n");
    }

    #[test]
    fn test_empty_key_and_unicode() {
        assert_eq!(format_value(&json!({"": 1})), ": 1 \n");
        assert_eq!(capitalize("élan"), "Élan");
    }
}
