//! Cache management commands

use chrono::Utc;
use colored::Colorize;

use super::open_cache;
use crate::cli::args::{CacheArgs, CacheCommands, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output;

/// Handle cache commands
pub fn cache(config: &Config, args: &CacheArgs, format: OutputFormat) -> Result<String> {
    let mut cache = open_cache(config, args.cache_file.as_deref());

    match &args.command {
        CacheCommands::Status => output::format_cache_status(&cache.status(Utc::now()), format),
        CacheCommands::Clear => {
            let removed = cache.len();
            cache.clear()?;

            match format {
                OutputFormat::Pretty => Ok(format!(
                    "{} Cache cleared ({} {})",
                    "✓".green(),
                    removed,
                    if removed == 1 { "entry" } else { "entries" }
                )),
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "status": "cleared",
                        "removed": removed,
                        "cache_file": cache.file().to_string_lossy(),
                    });
                    Ok(serde_json::to_string_pretty(&json)?)
                }
            }
        }
    }
}
