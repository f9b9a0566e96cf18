//! The interactive wizard command

use std::fs;

use colored::Colorize;
use tracing::info;

use super::{open_cache, persist};
use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::Config;
use crate::conversation::StdConsole;
use crate::error::Result;
use crate::llm;
use crate::mcp::McpClient;
use crate::output;
use crate::packages::PackageSet;
use crate::wizard::Wizard;

/// Resolve packages, run the wizard and render the result
pub fn run(config: &Config, args: &RunArgs, format: OutputFormat) -> Result<String> {
    // Model first so a missing key fails before any network traffic
    let model = llm::from_config(config)?;

    let transcript = match args.transcript {
        Some(ref path) => Some(fs::read_to_string(path)?),
        None => None,
    };

    let mut cache = open_cache(config, args.cache_file.as_deref());
    let mut source = McpClient::new(config)?;
    let packages = PackageSet::resolve(&mut cache, &mut source)?;
    persist(&cache);

    let mut console = StdConsole::new();
    let result = Wizard::new(model.as_ref(), &mut console).run(&packages, transcript)?;
    info!(business_type = %result.business_type, packages = result.packages.len(), "wizard finished");

    let rendered = output::format_result(&result, format)?;

    if let Some(ref path) = args.save {
        let saved = match format {
            OutputFormat::Pretty => result.summary(),
            OutputFormat::Json => rendered.clone(),
        };
        fs::write(path, saved)?;

        if format == OutputFormat::Pretty {
            return Ok(format!(
                "{rendered}\n\n{} Saved to {}",
                "✓".green(),
                path.display()
            ));
        }
    }

    Ok(rendered)
}
