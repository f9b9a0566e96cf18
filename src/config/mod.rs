mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{
    CacheConfig, Config, LlmConfig, McpConfig, NetworkConfig, Provider, SETTABLE_KEYS,
};
