use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC request; a notification when `id` is absent
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: Some(id),
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            method: method.into(),
            params: None,
        }
    }
}

/// JSON-RPC response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Result of `tools/call`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    #[serde(default)]
    pub content: Vec<ToolContent>,
    #[serde(default)]
    pub structured_content: Option<Value>,
    #[serde(default)]
    pub is_error: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl ToolCallResult {
    /// Concatenated text parts
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ToolContent::Text { text } => Some(text.as_str()),
                ToolContent::Other => None,
            })
            .collect()
    }

    /// Payload as JSON: structured content when present, otherwise the text
    /// parsed as JSON. Unparseable text yields an empty result set.
    pub fn payload(&self) -> Value {
        if let Some(structured) = &self.structured_content {
            return structured.clone();
        }
        serde_json::from_str(&self.text())
            .unwrap_or_else(|_| serde_json::json!({ "results": [] }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_omits_id() {
        let value = serde_json::to_value(JsonRpcRequest::notification("notifications/initialized"))
            .unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("params").is_none());
        assert_eq!(value["jsonrpc"], "2.0");
    }

    #[test]
    fn test_tool_result_text_payload() {
        let result: ToolCallResult = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "{\"results\": "},
                {"type": "image", "data": "...", "mimeType": "image/png"},
                {"type": "text", "text": "[{\"name\": \"Pagos\"}]}"}
            ]
        }))
        .unwrap();

        assert!(!result.is_error);
        assert_eq!(result.payload()["results"][0]["name"], "Pagos");
    }

    #[test]
    fn test_structured_content_wins() {
        let result: ToolCallResult = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "ignored"}],
            "structuredContent": {"results": [{"name": "DB"}]}
        }))
        .unwrap();

        assert_eq!(result.payload()["results"][0]["name"], "DB");
    }

    #[test]
    fn test_unparseable_text_is_empty_result_set() {
        let result: ToolCallResult = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "no packages matched"}]
        }))
        .unwrap();

        assert_eq!(result.payload(), json!({"results": []}));
    }
}
