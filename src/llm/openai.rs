use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{ChatModel, StructuredRequest};
use crate::config::Config;
use crate::error::{Result, WizardError};
use crate::http::{self, RetryPolicy};

const BASE_URL: &str = "https://api.openai.com";

/// OpenAI Chat Completions client using `json_schema` response format
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiClient {
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

    fn send(&self, body: &Value) -> Result<CompletionResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()?;

        let body = http::check_status(response)?.text()?;
        serde_json::from_str(&body).map_err(WizardError::Json)
    }
}

impl ChatModel for OpenAiClient {
    fn complete(&self, request: StructuredRequest<'_>) -> Result<Value> {
        let mut messages = vec![json!({"role": "system", "content": request.system})];
        messages.extend(
            request
                .messages
                .iter()
                .map(|m| json!({"role": m.role, "content": m.content})),
        );

        let body = json!({
            "model": self.model,
            "max_completion_tokens": self.max_tokens,
            "messages": messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema_name,
                    "schema": request.schema,
                    "strict": true,
                }
            }
        });

        debug!(model = %self.model, schema = request.schema_name, turns = request.messages.len(), "openai request");
        let response = self.retry.run("openai request", || self.send(&body))?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| WizardError::protocol("completion has no choices"))?;

        if let Some(refusal) = message.refusal {
            return Err(WizardError::schema(request.schema_name, format!("model refused: {refusal}")));
        }

        let content = message.content.unwrap_or_default();
        serde_json::from_str(&content)
            .map_err(|e| WizardError::schema(request.schema_name, e.to_string()))
    }
}
