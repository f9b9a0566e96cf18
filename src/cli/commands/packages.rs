//! Package lookup commands

use tracing::debug;

use super::{open_cache, persist};
use crate::cli::args::{OutputFormat, PackagesArgs, SearchArgs};
use crate::config::Config;
use crate::error::{Result, WizardError};
use crate::mcp::McpClient;
use crate::output;
use crate::packages::{PackageRole, PackageSet};

/// Resolve and show the package behind every role
pub fn packages(config: &Config, args: &PackagesArgs, format: OutputFormat) -> Result<String> {
    let mut cache = open_cache(config, args.cache_file.as_deref());
    if args.refresh {
        for role in PackageRole::ALL {
            if cache.invalidate(role.query()) {
                debug!(query = role.query(), "dropped cached package");
            }
        }
    }

    let mut source = McpClient::new(config)?;
    let set = PackageSet::resolve(&mut cache, &mut source)?;
    persist(&cache);

    output::format_package_set(&set, format)
}

/// Look up one query through the cache
pub fn search(config: &Config, args: &SearchArgs, format: OutputFormat) -> Result<String> {
    if args.query.trim().is_empty() {
        return Err(WizardError::InvalidArgument(
            "search query cannot be empty".to_string(),
        ));
    }

    let mut cache = open_cache(config, args.cache_file.as_deref());
    let mut source = McpClient::new(config)?;
    let package = cache.get(&args.query, &mut source)?;
    persist(&cache);

    output::format_package(&package, format)
}
