use thiserror::Error;

/// Result type alias for bizflow operations
pub type Result<T> = std::result::Result<T, WizardError>;

/// Errors that can occur while running the wizard
#[derive(Error, Debug)]
pub enum WizardError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing required configuration
    #[error("{0}")]
    ConfigMissing(String),

    /// Chat provider error with HTTP status
    #[error("Model API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// MCP server returned a JSON-RPC error
    #[error("MCP error ({code}): {message}")]
    Mcp { code: i64, message: String },

    /// Response did not follow the expected protocol shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Structured response did not match the agent schema
    #[error("Response did not match schema '{schema}': {message}")]
    Schema { schema: String, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to write config file: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Console input ended before the conversation finished
    #[error("Input closed before the conversation finished")]
    InputClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

impl WizardError {
    /// Create an API error from HTTP status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a config missing error with helpful message
    pub fn config_missing(message: impl Into<String>) -> Self {
        Self::ConfigMissing(message.into())
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a schema mismatch error
    pub fn schema(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            schema: schema.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::ConfigMissing(_)
            | Self::Toml(_)
            | Self::TomlSerialize(_)
            | Self::Env(_) => 2,
            _ => 1,
        }
    }

    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_two() {
        assert_eq!(WizardError::config_missing("no key").exit_code(), 2);
        assert_eq!(WizardError::Config("bad".into()).exit_code(), 2);
    }

    #[test]
    fn test_runtime_errors_exit_with_one() {
        assert_eq!(WizardError::api(500, "boom").exit_code(), 1);
        assert_eq!(WizardError::InputClosed.exit_code(), 1);
    }

    #[test]
    fn test_transient_statuses() {
        assert!(WizardError::api(429, "slow down").is_transient());
        assert!(WizardError::api(503, "unavailable").is_transient());
        assert!(!WizardError::api(400, "bad request").is_transient());
        assert!(!WizardError::protocol("garbled").is_transient());
    }
}
