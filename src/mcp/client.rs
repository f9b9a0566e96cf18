use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::types::*;
use crate::config::Config;
use crate::error::{Result, WizardError};
use crate::http::{self, RetryPolicy};
use crate::packages::{PackageInfo, PackageSource};

const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Minimal MCP client over streamable HTTP, enough to call one search tool
pub struct McpClient {
    client: Client,
    endpoint: Url,
    token: Option<String>,
    tool: String,
    retry: RetryPolicy,
    session_id: Option<String>,
    next_id: u64,
    initialized: bool,
}

impl McpClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = config.require_mcp_url()?;
        let client = http::build_client(&config.network)?;

        Ok(Self {
            client,
            endpoint,
            token: config.mcp.token.clone(),
            tool: config.mcp.tool.clone(),
            retry: RetryPolicy::from(&config.network),
            session_id: None,
            next_id: 1,
            initialized: false,
        })
    }

    /// Session id assigned by the server, if any
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn post(&self, body: &JsonRpcRequest) -> Result<reqwest::blocking::Response> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/event-stream")
            .json(body);

        if let Some(ref session) = self.session_id {
            request = request.header(SESSION_HEADER, session);
        }
        if let Some(ref token) = self.token {
            request = request.bearer_auth(bearer_token(token));
        }

        http::check_status(request.send()?)
    }

    /// Send a request and return its `result`
    fn rpc(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;
        let request = JsonRpcRequest::new(id, method, params);

        debug!(method, id, "MCP request");
        let retry = self.retry;
        let response = retry.run(method, || self.post(&request))?;

        if let Some(session) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
        {
            self.session_id = Some(session.to_string());
        }

        let is_sse = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/event-stream"));
        let body = response.text()?;

        let envelope = if is_sse {
            parse_sse(&body, id)?
        } else {
            serde_json::from_str::<JsonRpcResponse>(&body)?
        };

        if let Some(error) = envelope.error {
            return Err(WizardError::Mcp {
                code: error.code,
                message: error.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| WizardError::protocol(format!("MCP response to '{method}' has no result")))
    }

    fn notify(&mut self, method: &str) -> Result<()> {
        debug!(method, "MCP notification");
        self.post(&JsonRpcRequest::notification(method))?;
        Ok(())
    }

    fn ensure_initialized(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        let info = self.rpc(
            "initialize",
            Some(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": "bizflow",
                    "version": env!("CARGO_PKG_VERSION"),
                }
            })),
        )?;
        let server = info.get("serverInfo").cloned().unwrap_or_default();
        debug!(%server, "MCP session initialized");

        self.notify("notifications/initialized")?;
        self.initialized = true;
        Ok(())
    }

    /// Call a tool by name
    pub fn call_tool(&mut self, name: &str, arguments: Value) -> Result<ToolCallResult> {
        self.ensure_initialized()?;

        let result = self.rpc(
            "tools/call",
            Some(json!({
                "name": name,
                "arguments": arguments,
            })),
        )?;
        let result: ToolCallResult = serde_json::from_value(result)?;

        if result.is_error {
            return Err(WizardError::Mcp {
                code: -1,
                message: format!("tool '{}' failed: {}", name, result.text()),
            });
        }
        Ok(result)
    }
}

impl PackageSource for McpClient {
    fn search_package(&mut self, query: &str) -> Result<PackageInfo> {
        let tool = self.tool.clone();
        let result = self.call_tool(&tool, json!({ "query": query }))?;
        Ok(PackageInfo::from_search_results(query, &result.payload()))
    }
}

/// Token without a leading `Bearer ` scheme, so either form can be configured
fn bearer_token(token: &str) -> &str {
    let token = token.trim();
    match token.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer ") => token[7..].trim_start(),
        _ => token,
    }
}

/// Pick the response for `id` out of an SSE body
fn parse_sse(body: &str, id: u64) -> Result<JsonRpcResponse> {
    let mut fallback = None;

    for data in body
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .filter(|data| !data.is_empty())
    {
        let Ok(message) = serde_json::from_str::<JsonRpcResponse>(data) else {
            continue;
        };
        if message.id.as_ref().and_then(Value::as_u64) == Some(id) {
            return Ok(message);
        }
        if fallback.is_none() && (message.result.is_some() || message.error.is_some()) {
            fallback = Some(message);
        }
    }

    fallback.ok_or_else(|| WizardError::protocol("MCP event stream carried no response"))
}
