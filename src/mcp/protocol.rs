//! MCP protocol response helpers.

use std::fmt::Display;

use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use serde::Serialize;

/// Single-item response serialized as compact JSON text.
///
/// # Example
///
/// ```ignore
/// let info = DataverseResponse { name: "dv".into(), triplestore_address: "axone1…".into() };
/// JsonText(info).into()  // {"name":"dv","triplestore_address":"axone1…"}
/// ```
pub struct JsonText<T>(pub T);

impl<T: Serialize> From<JsonText<T>> for Result<CallToolResult, McpError> {
    fn from(response: JsonText<T>) -> Self {
        let text = serde_json::to_string(&response.0).map_err(|e| {
            McpError::internal_error(format!("failed to marshal response: {}", e), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

/// Plain text result.
pub fn text(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

/// Tool-level error result carrying `err`'s message. Not a protocol error.
pub fn tool_error(err: &impl Display) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn first_text(result: &CallToolResult) -> String {
        result.content[0].as_text().unwrap().text.clone()
    }

    #[test]
    fn test_json_text_is_compact() {
        let mut map = BTreeMap::new();
        map.insert("name", "dv");
        let result: Result<CallToolResult, McpError> = JsonText(map).into();
        let result = result.unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(first_text(&result), r#"{"name":"dv"}"#);
    }

    #[test]
    fn test_tool_error_is_flagged() {
        let result = tool_error(&"no result").unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(first_text(&result), "no result");
    }
}
