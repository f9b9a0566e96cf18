use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{ChatModel, StructuredRequest};
use crate::config::Config;
use crate::error::{Result, WizardError};
use crate::http::{self, RetryPolicy};

const BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
///
/// Structured output is obtained by offering a single tool whose input schema
/// is the response schema and forcing the model to call it.
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    ToolUse {
        name: String,
        input: Value,
    },
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            client: http::build_client(&config.network)?,
            base_url: config
                .llm
                .base_url
                .clone()
                .unwrap_or_else(|| BASE_URL.to_string()),
            api_key,
            model: config.llm.model().to_string(),
            max_tokens: config.llm.max_tokens,
            retry: RetryPolicy::from(&config.network),
        })
    }

    fn send(&self, body: &Value) -> Result<MessagesResponse> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()?;

        let body = http::check_status(response)?.text()?;
        serde_json::from_str(&body).map_err(WizardError::Json)
    }
}

impl ChatModel for AnthropicClient {
    fn complete(&self, request: StructuredRequest<'_>) -> Result<Value> {
        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": request.system,
            "messages": request.messages,
            "tools": [{
                "name": request.schema_name,
                "description": "Respond to the user using this structure.",
                "input_schema": request.schema,
            }],
            "tool_choice": {"type": "tool", "name": request.schema_name},
        });

        debug!(model = %self.model, schema = request.schema_name, turns = request.messages.len(), "anthropic request");
        let response = self.retry.run("anthropic request", || self.send(&body))?;

        let mut text = String::new();
        for block in response.content {
            match block {
                ContentBlock::ToolUse { name, input } if name == request.schema_name => {
                    return Ok(input)
                }
                ContentBlock::Text { text: t } => text.push_str(&t),
                _ => {}
            }
        }

        Err(WizardError::schema(
            request.schema_name,
            format!(
                "model did not call the response tool (stop reason: {}): {}",
                response.stop_reason.as_deref().unwrap_or("unknown"),
                text
            ),
        ))
    }
}
