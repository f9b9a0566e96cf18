use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use url::Url;

use super::paths::Paths;
use crate::error::{Result, WizardError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat model provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// MCP package search endpoint
    #[serde(default)]
    pub mcp: McpConfig,

    /// Package cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Timeouts and retries for outbound calls
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Supported chat-completion providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    /// Model used when none is configured
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-3-5-sonnet-20241022",
            Self::OpenAi => "gpt-5",
        }
    }

    /// Environment variable holding the provider key
    pub fn key_env(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            other => Err(WizardError::InvalidArgument(format!(
                "llm.provider must be 'anthropic' or 'openai', got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// Chat model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: Provider,
    /// Model name; provider default when unset
    pub model: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key; the provider's environment variable takes precedence
    pub api_key: Option<String>,
    /// Override for the provider base URL
    pub base_url: Option<String>,
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// Configured model or the provider default
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// MCP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    #[serde(default = "default_mcp_url")]
    pub url: String,
    /// Optional bearer token
    pub token: Option<String>,
    /// Name of the package search tool
    #[serde(default = "default_mcp_tool")]
    pub tool: String,
}

fn default_mcp_url() -> String {
    "http://localhost:3000/mcp".to_string()
}

fn default_mcp_tool() -> String {
    "search-workflow-packages".to_string()
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            url: default_mcp_url(),
            token: None,
            tool: default_mcp_tool(),
        }
    }
}

/// Package cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache document, relative to the working directory unless absolute
    #[serde(default = "default_cache_file")]
    pub file: PathBuf,
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

fn default_cache_file() -> PathBuf {
    PathBuf::from("packages_cache.json")
}

fn default_ttl_hours() -> u64 {
    24
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file: default_cache_file(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

/// Longest accepted freshness window: ten years
pub const MAX_TTL_HOURS: u64 = 24 * 365 * 10;

impl CacheConfig {
    /// Freshness window, clamped to [`MAX_TTL_HOURS`]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours.min(MAX_TTL_HOURS) as i64)
    }

    fn validate(&self) -> Result<()> {
        if self.ttl_hours > MAX_TTL_HOURS {
            return Err(WizardError::Config(format!(
                "cache.ttl_hours must be at most {MAX_TTL_HOURS}, got {}",
                self.ttl_hours
            )));
        }
        Ok(())
    }
}

/// Outbound call limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    500
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Keys accepted by `config set`
pub const SETTABLE_KEYS: &[&str] = &[
    "llm.provider",
    "llm.model",
    "llm.max_tokens",
    "llm.api_key",
    "llm.base_url",
    "mcp.url",
    "mcp.token",
    "mcp.tool",
    "cache.file",
    "cache.ttl_hours",
    "network.timeout_secs",
    "network.retries",
    "network.backoff_ms",
];

impl Config {
    /// Load configuration from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let paths = Paths::new()?;
        let mut config = Self::load_from(&paths)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific paths instance
    pub fn load_from(paths: &Paths) -> Result<Self> {
        if !paths.config_exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&paths.config_file)?;
        let config: Config = toml::from_str(&contents)?;
        config.cache.validate()?;
        Ok(config)
    }

    /// Overlay values from the environment
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(self.llm.provider.key_env()) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = non_empty("BIZFLOW_MCP_URL") {
            self.mcp.url = url;
        }
        if let Some(token) = non_empty("BIZFLOW_MCP_TOKEN") {
            self.mcp.token = Some(token);
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let paths = Paths::new()?;
        self.save_to(&paths)
    }

    /// Save configuration to a specific paths instance
    pub fn save_to(&self, paths: &Paths) -> Result<()> {
        paths.ensure_dirs()?;
        let contents = toml::to_string_pretty(self)?;
        fs::write(&paths.config_file, &contents)?;

        // Config file may hold API keys
        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&paths.config_file, perms)?;
        }

        Ok(())
    }

    /// Get the model API key or return an error with instructions
    pub fn require_api_key(&self) -> Result<&str> {
        self.llm.api_key.as_deref().ok_or_else(|| {
            WizardError::config_missing(format!(
                "Model API key not configured. Set {} or run 'bizflow config init'.",
                self.llm.provider.key_env()
            ))
        })
    }

    /// Get the MCP endpoint as a validated URL
    pub fn require_mcp_url(&self) -> Result<Url> {
        let url = Url::parse(&self.mcp.url).map_err(|e| {
            WizardError::Config(format!("Invalid MCP URL '{}': {}", self.mcp.url, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(WizardError::Config(format!(
                "MCP URL must use http or https, got '{scheme}'"
            ))),
        }
    }

    /// Set a value by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "llm.provider" => self.llm.provider = Provider::parse(value)?,
            "llm.model" => self.llm.model = Some(value.to_string()),
            "llm.max_tokens" => self.llm.max_tokens = parse_number(key, value)?,
            "llm.api_key" => self.llm.api_key = Some(value.to_string()),
            "llm.base_url" => self.llm.base_url = Some(value.to_string()),
            "mcp.url" => self.mcp.url = value.to_string(),
            "mcp.token" => self.mcp.token = Some(value.to_string()),
            "mcp.tool" => self.mcp.tool = value.to_string(),
            "cache.file" => self.cache.file = PathBuf::from(value),
            "cache.ttl_hours" => {
                let mut cache = self.cache.clone();
                cache.ttl_hours = parse_number(key, value)?;
                cache.validate()?;
                self.cache = cache;
            }
            "network.timeout_secs" => self.network.timeout_secs = parse_number(key, value)?,
            "network.retries" => self.network.retries = parse_number(key, value)?,
            "network.backoff_ms" => self.network.backoff_ms = parse_number(key, value)?,
            _ => {
                return Err(WizardError::InvalidArgument(format!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    SETTABLE_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| WizardError::InvalidArgument(format!("{key} must be a number, got '{value}'")))
}
