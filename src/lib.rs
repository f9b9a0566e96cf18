//! Interview a business owner, pick reusable packages over MCP and draft a
//! chat-agent workflow with a structured-output chat model.

pub mod agent;
pub mod cache;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod http;
pub mod llm;
pub mod mcp;
pub mod output;
pub mod packages;
pub mod wizard;
pub mod workflow;
