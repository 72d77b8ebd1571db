//! Helpers shared across tool suites.
//!
//! Result constructors and the empty parameter struct used by tools that
//! take no arguments.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::fetch::FetchError;

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Create a success result with text content.
pub fn text_result(content: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content.into())])
}

/// Create a success result holding pretty-printed JSON.
pub fn json_result(value: &Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    text_result(text)
}

/// Create a success result with both a JSON text block and structured content.
pub fn structured_result<T: Serialize>(data: &T) -> CallToolResult {
    match serde_json::to_value(data) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(
                serde_json::to_string_pretty(&structured).unwrap_or_else(|_| structured.to_string()),
            )],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// The suite's fixed failure text, returned as ordinary content.
pub fn unavailable(message: &str, err: &FetchError) -> CallToolResult {
    warn!(error = %err, "{}", message);
    text_result(message)
}

/// `None` for missing or whitespace-only strings.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::result_text;
    use serde_json::json;

    #[test]
    fn test_json_result_is_pretty() {
        let result = json_result(&json!({"a": 1}));
        assert_eq!(result_text(&result), "{\n  \"a\": 1\n}");
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn test_structured_result_carries_value() {
        let result = structured_result(&json!({"ok": true}));
        assert_eq!(result.structured_content, Some(json!({"ok": true})));
    }

    #[test]
    fn test_unavailable_is_not_an_error_result() {
        let result = unavailable("Unable to fetch news.", &FetchError::Timeout);
        assert_eq!(result_text(&result), "Unable to fetch news.");
        assert_eq!(result.is_error, Some(false));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  x ".into())), Some("x"));
        assert_eq!(non_blank(&Some("   ".into())), None);
        assert_eq!(non_blank(&None), None);
    }
}
