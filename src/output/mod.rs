pub mod json;
pub mod pretty;

use crate::cache::CacheStatus;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::packages::{PackageInfo, PackageSet};
use crate::wizard::WizardResult;

/// Format the wizard result based on output format
pub fn format_result(result: &WizardResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_result(result)),
        OutputFormat::Json => json::format_result(result),
    }
}

/// Format a single package based on output format
pub fn format_package(package: &PackageInfo, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_package(package).trim_end().to_string()),
        OutputFormat::Json => json::format_package(package),
    }
}

/// Format the resolved package set based on output format
pub fn format_package_set(set: &PackageSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_package_set(set)),
        OutputFormat::Json => json::format_package_set(set),
    }
}

/// Format cache status based on output format
pub fn format_cache_status(status: &CacheStatus, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_cache_status(status)),
        OutputFormat::Json => json::format_cache_status(status),
    }
}
