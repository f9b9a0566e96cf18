use crate::cache::CacheStatus;
use crate::error::Result;
use crate::packages::{PackageInfo, PackageSet};
use crate::wizard::WizardResult;

/// Format the wizard result as JSON
pub fn format_result(result: &WizardResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Format a package description as JSON
pub fn format_package(package: &PackageInfo) -> Result<String> {
    Ok(serde_json::to_string_pretty(package)?)
}

/// Format the resolved package set as JSON
pub fn format_package_set(set: &PackageSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(set)?)
}

/// Format the cache status as JSON
pub fn format_cache_status(status: &CacheStatus) -> Result<String> {
    let json = serde_json::json!({
        "cache_file": status.file.to_string_lossy(),
        "exists": status.exists,
        "fresh": status.fresh_count(),
        "stale": status.stale_count(),
        "entries": status.entries,
    });
    Ok(serde_json::to_string_pretty(&json)?)
}

