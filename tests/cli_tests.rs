//! CLI integration tests
//!
//! Tests that don't require a model provider

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use chrono::{Duration, Utc};
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// Get a command for the bizflow binary with an isolated home and environment
fn bizflow(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bizflow").unwrap();
    cmd.env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("BIZFLOW_MCP_URL")
        .env_remove("BIZFLOW_MCP_TOKEN")
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

fn seed_cache(file: &Path, query: &str, name: &str, age: Duration) {
    let ts = (Utc::now() - age).to_rfc3339();
    let mut doc = serde_json::Map::new();
    doc.insert(
        query.to_string(),
        json!({
            "ts": ts,
            "data": {
                "name": name,
                "workflow_syntax": "",
                "inputs": [{"name": "amount", "type": "number", "description": "", "required": true}],
                "outputs": [],
                "usage": "Cobros en línea"
            }
        }),
    );
    fs::write(file, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat-agent workflow"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("packages"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bizflow"));
}

#[test]
fn test_run_help() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run the interactive wizard"))
        .stdout(predicate::str::contains("--transcript"))
        .stdout(predicate::str::contains("--save"))
        .stdout(predicate::str::contains("--cache-file"));
}

#[test]
fn test_config_help() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage configuration"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_config_path() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".bizflow/config.toml"))
        .stdout(predicate::str::contains("Exists: no"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["config", "set", "llm.provider", "openai"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set llm.provider = openai"));

    bizflow(home.path())
        .args(["config", "set", "llm.api_key", "sk-test-1234567890"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-t...7890"));

    bizflow(home.path())
        .args(["--output", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"provider\": \"openai\""))
        .stdout(predicate::str::contains("sk-t...7890"))
        .stdout(predicate::str::contains("sk-test-1234567890").not());

    assert!(home.path().join(".bizflow/config.toml").exists());
}

#[test]
fn test_config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["config", "set", "llm.colour", "blue"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_set_rejects_oversized_ttl() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["config", "set", "cache.ttl_hours", "9000000000000000"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cache.ttl_hours must be at most"));

    bizflow(home.path())
        .args(["cache", "status"])
        .assert()
        .success();
}

#[test]
fn test_broken_config_file_is_a_config_error() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".bizflow")).unwrap();
    fs::write(home.path().join(".bizflow/config.toml"), "[llm\nprovider = ").unwrap();

    bizflow(home.path())
        .args(["cache", "status"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("config file"));
}

#[test]
fn test_run_without_api_key() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .arg("run")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_cache_status_empty() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache Status"))
        .stdout(predicate::str::contains("packages_cache.json"))
        .stdout(predicate::str::contains("Not cached"));
}

#[test]
fn test_cache_status_reports_freshness() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("custom.json");
    seed_cache(&file, "payment method", "Pagos", Duration::hours(25));

    bizflow(home.path())
        .args(["--output", "json", "cache", "status", "--cache-file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stale\": 1"))
        .stdout(predicate::str::contains("\"fresh\": 0"))
        .stdout(predicate::str::contains("\"package\": \"Pagos\""));
}

#[test]
fn test_cache_clear_removes_file() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("packages_cache.json");
    seed_cache(&file, "payment method", "Pagos", Duration::minutes(5));

    bizflow(home.path())
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared (1 entry)"));

    assert!(!file.exists());
}

#[test]
fn test_search_uses_fresh_cache_without_server() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("packages_cache.json");
    seed_cache(&file, "payment method", "Pagos", Duration::minutes(5));

    // Nothing listens here; a cache hit must not connect
    bizflow(home.path())
        .env("BIZFLOW_MCP_URL", "http://127.0.0.1:9/mcp")
        .args(["search", "payment method"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Pagos"))
        .stdout(predicate::str::contains("*amount (number)"));
}

#[test]
fn test_search_queries_server_and_caches() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _init = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "initialize"})))
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#)
        .create();
    let _initialized = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({"method": "notifications/initialized"})))
        .with_status(202)
        .create();
    let call = server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({
            "method": "tools/call",
            "params": {"arguments": {"query": "database creation"}}
        })))
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "result": {"content": [{"type": "text", "text": r#"{"results":[{"name":"BaseDatos"}]}"#}]}
            })
            .to_string(),
        )
        .expect(1)
        .create();

    bizflow(home.path())
        .env("BIZFLOW_MCP_URL", format!("{}/mcp", server.url()))
        .args(["--output", "json", "search", "database creation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"BaseDatos\""));

    call.assert();
    let cached = fs::read_to_string(home.path().join("packages_cache.json")).unwrap();
    assert!(cached.contains("\"database creation\""));
}

#[test]
fn test_search_rejects_empty_query() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["search", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("search query cannot be empty"));
}

#[test]
fn test_invalid_command() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_global_flags() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["--verbose", "--quiet", "cache", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_output_format_options() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["--output", "yaml", "cache", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    bizflow(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bizflow"));
}
