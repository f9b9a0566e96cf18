//! Chat-completion providers returning structured JSON

mod anthropic;
mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, Provider};
use crate::error::Result;

/// Speaker of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A request whose answer must conform to a JSON schema
#[derive(Debug, Clone, Copy)]
pub struct StructuredRequest<'a> {
    pub system: &'a str,
    pub messages: &'a [ChatMessage],
    pub schema_name: &'a str,
    pub schema: &'a Value,
}

/// A model that answers with a JSON object matching the request schema
pub trait ChatModel {
    fn complete(&self, request: StructuredRequest<'_>) -> Result<Value>;
}

/// Build the configured provider client
pub fn from_config(config: &Config) -> Result<Box<dyn ChatModel>> {
    Ok(match config.llm.provider {
        Provider::Anthropic => Box::new(AnthropicClient::new(config)?),
        Provider::OpenAi => Box::new(OpenAiClient::new(config)?),
    })
}
