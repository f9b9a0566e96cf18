use std::io::{self, Write};

use colored::Colorize;

use crate::cli::args::{ConfigArgs, ConfigCommands, OutputFormat};
use crate::config::{Config, Paths, Provider};
use crate::error::{Result, WizardError};

/// Handle the config command. `effective` carries environment overrides and is
/// only displayed; writes go through the file contents alone.
pub fn config(effective: &Config, args: &ConfigArgs, format: OutputFormat) -> Result<String> {
    match &args.command {
        ConfigCommands::Show => config_show(effective, format),
        ConfigCommands::Set { key, value } => config_set(key, value, format),
        ConfigCommands::Path => config_path(format),
        ConfigCommands::Init => config_init(format),
    }
}

fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

fn or_unset(value: Option<&str>) -> String {
    value
        .map(str::to_string)
        .unwrap_or_else(|| "(not set)".dimmed().to_string())
}

/// Show current configuration
fn config_show(config: &Config, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("{}\n", "Configuration".bold()));
            output.push_str(&"─".repeat(40));
            output.push('\n');

            output.push_str(&format!("\n{}\n", "[llm]".cyan()));
            output.push_str(&format!("  provider = {}\n", config.llm.provider));
            output.push_str(&format!("  model = {}\n", config.llm.model()));
            output.push_str(&format!("  max_tokens = {}\n", config.llm.max_tokens));
            output.push_str(&format!(
                "  api_key = {}\n",
                or_unset(config.llm.api_key.as_deref().map(mask).as_deref())
            ));
            output.push_str(&format!(
                "  base_url = {}\n",
                or_unset(config.llm.base_url.as_deref())
            ));

            output.push_str(&format!("\n{}\n", "[mcp]".cyan()));
            output.push_str(&format!("  url = {}\n", config.mcp.url));
            output.push_str(&format!(
                "  token = {}\n",
                or_unset(config.mcp.token.as_deref().map(mask).as_deref())
            ));
            output.push_str(&format!("  tool = {}\n", config.mcp.tool));

            output.push_str(&format!("\n{}\n", "[cache]".cyan()));
            output.push_str(&format!("  file = {}\n", config.cache.file.display()));
            output.push_str(&format!("  ttl_hours = {}\n", config.cache.ttl_hours));

            output.push_str(&format!("\n{}\n", "[network]".cyan()));
            output.push_str(&format!("  timeout_secs = {}\n", config.network.timeout_secs));
            output.push_str(&format!("  retries = {}\n", config.network.retries));
            output.push_str(&format!("  backoff_ms = {}\n", config.network.backoff_ms));

            Ok(output)
        }
        OutputFormat::Json => {
            let mut safe_config = config.clone();
            safe_config.llm.api_key = safe_config.llm.api_key.as_deref().map(mask);
            safe_config.mcp.token = safe_config.mcp.token.as_deref().map(mask);
            Ok(serde_json::to_string_pretty(&safe_config)?)
        }
    }
}

/// Set a configuration value
fn config_set(key: &str, value: &str, format: OutputFormat) -> Result<String> {
    let paths = Paths::new()?;
    let mut config = Config::load_from(&paths)?;
    config.set(key, value)?;
    config.save_to(&paths)?;

    let shown = if key.ends_with("api_key") || key.ends_with("token") {
        mask(value)
    } else {
        value.to_string()
    };

    match format {
        OutputFormat::Pretty => Ok(format!("{} Set {} = {}", "✓".green(), key, shown)),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "success": true,
                "key": key,
                "value": shown
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

/// Show configuration file path
fn config_path(format: OutputFormat) -> Result<String> {
    let paths = Paths::new()?;

    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("Config file: {}\n", paths.config_file.display()));
            output.push_str(&format!(
                "Exists: {}\n",
                if paths.config_exists() {
                    "yes".green()
                } else {
                    "no".yellow()
                }
            ));
            Ok(output)
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "path": paths.config_file.display().to_string(),
                "exists": paths.config_exists()
            });
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}

fn prompt(label: &str, default: &str) -> Result<String> {
    print!("{} [{}]: ", label, default.dimmed());
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let line = line.trim();
    Ok(if line.is_empty() {
        default.to_string()
    } else {
        line.to_string()
    })
}

/// Initialize configuration interactively
fn config_init(format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Err(WizardError::InvalidArgument(
            "config init requires interactive mode (--output pretty)".to_string(),
        ));
    }

    let paths = Paths::new()?;
    let mut config = Config::load_from(&paths)?;

    println!("{}", "Bizflow Configuration".bold());
    println!("{}", "─".repeat(40));
    println!();

    let provider = prompt("Model provider (anthropic/openai)", &config.llm.provider.to_string())?;
    config.set("llm.provider", &provider)?;

    let key = rpassword::prompt_password(format!(
        "Enter your {} API key: ",
        match config.llm.provider {
            Provider::Anthropic => "Anthropic",
            Provider::OpenAi => "OpenAI",
        }
    ))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(WizardError::InvalidArgument(
            "API key cannot be empty".to_string(),
        ));
    }
    config.set("llm.api_key", key)?;

    let url = prompt("MCP server URL", &config.mcp.url)?;
    config.set("mcp.url", &url)?;
    config.require_mcp_url()?;

    config.save_to(&paths)?;

    Ok(format!(
        "\n{} Configuration saved to: {}\n\nRun '{}' to start the wizard.",
        "✓".green(),
        paths.config_file.display(),
        "bizflow run".cyan()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_ends_of_long_secrets() {
        assert_eq!(mask("sk-ant-1234567890"), "sk-a...7890");
        assert_eq!(mask("short"), "****");
    }

    #[test]
    fn test_show_json_hides_secrets() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-ant-1234567890".to_string());
        config.mcp.token = Some("tok".to_string());

        let json = config_show(&config, OutputFormat::Json).unwrap();
        assert!(json.contains("sk-a...7890"));
        assert!(!json.contains("sk-ant-1234567890"));
        assert!(json.contains("\"token\": \"****\""));
    }
}
