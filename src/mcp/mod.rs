mod client;
pub mod types;

pub use client::McpClient;
pub use types::{ToolCallResult, ToolContent};
