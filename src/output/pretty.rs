use colored::Colorize;
use terminal_size::{terminal_size, Width};

use crate::cache::CacheStatus;
use crate::packages::{PackageInfo, PackageIo, PackageRole, PackageSet};
use crate::wizard::WizardResult;

/// Horizontal rule sized to the terminal, capped at `max` columns
fn rule(max: usize) -> String {
    let width = terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(max)
        .min(max);
    "─".repeat(width)
}

/// Format age in human-readable form
pub fn format_age(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86_400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600)
    }
}

/// Format the final wizard result
pub fn format_result(result: &WizardResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "Business INFO".bold()));
    output.push_str(&rule(70));
    output.push('\n');
    output.push_str(&result.business_info);
    output.push_str("\n\n");

    output.push_str(&format!(
        "{} {}\n\n",
        "Tipo:".cyan(),
        result.business_type.to_string().bold()
    ));

    if !result.package_calls.is_empty() {
        output.push_str(&format!("{}\n", "Paquetes".bold()));
        output.push_str(&rule(70));
        output.push('\n');
        output.push_str(&result.package_calls);
        output.push_str("\n\n");
    }

    output.push_str(&format!("{}\n", "Flujo".bold()));
    output.push_str(&rule(70));
    output.push('\n');
    output.push_str(&result.workflow);

    output
}

fn format_io(label: &str, items: &[PackageIo], output: &mut String) {
    if items.is_empty() {
        return;
    }
    output.push_str(&format!("{}\n", label.cyan()));
    for io in items {
        let marker = if io.required {
            "*".red().to_string()
        } else {
            " ".to_string()
        };
        output.push_str(&format!("  {}{} ({})", marker, io.name.bold(), io.kind.dimmed()));
        if !io.description.is_empty() {
            output.push_str(&format!(" {}", io.description));
        }
        output.push('\n');
    }
}

/// Format a single package description
pub fn format_package(package: &PackageInfo) -> String {
    let mut output = String::new();

    match package.version {
        Some(ref version) => {
            output.push_str(&format!("{} {}\n", package.name.bold(), version.dimmed()))
        }
        None => output.push_str(&format!("{}\n", package.name.bold())),
    }

    if !package.usage.is_empty() {
        output.push_str(&format!("{} {}\n", "Usage:".cyan(), package.usage));
    }
    if !package.workflow_syntax.is_empty() {
        output.push_str(&format!("{} {}\n", "Syntax:".cyan(), package.workflow_syntax));
    }
    format_io("Inputs:", &package.inputs, &mut output);
    format_io("Outputs:", &package.outputs, &mut output);
    if let Some(ref homepage) = package.homepage {
        output.push_str(&format!("{} {}\n", "Docs:".cyan(), homepage.dimmed()));
    }
    if let Some(ref source) = package.source {
        output.push_str(&format!("{} {}\n", "Source:".cyan(), source.dimmed()));
    }

    output
}

/// Format the resolved package for every role
pub fn format_package_set(set: &PackageSet) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Packages".bold()));
    output.push_str(&rule(70));
    output.push('\n');

    for role in PackageRole::ALL {
        output.push_str(&format!(
            "{} {}\n",
            format!("[{}]", role.label()).magenta(),
            format!("query: \"{}\"", role.query()).dimmed()
        ));
        output.push_str(&format_package(set.get(role)));
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Format the cache status
pub fn format_cache_status(status: &CacheStatus) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Cache Status".bold()));
    output.push_str(&format!("Location: {}\n\n", status.file.display()));

    if status.entries.is_empty() {
        output.push_str(&format!("  {}\n", "Not cached".dimmed()));
        return output.trim_end().to_string();
    }

    output.push_str(&format!(
        "Entries: {} ({} fresh, {} stale)\n",
        status.entries.len(),
        status.fresh_count(),
        status.stale_count()
    ));
    for entry in &status.entries {
        let freshness = if entry.fresh {
            "(fresh)".green()
        } else {
            "(stale)".yellow()
        };
        output.push_str(&format!(
            "  {} → {}  {} {}\n",
            entry.query.cyan(),
            entry.package,
            format_age(entry.age_secs),
            freshness
        ));
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntryStatus;
    use std::path::PathBuf;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(5), "5s");
        assert_eq!(format_age(125), "2m 5s");
        assert_eq!(format_age(3 * 3600 + 120), "3h 2m");
        assert_eq!(format_age(2 * 86_400 + 3600), "2d 1h");
        assert_eq!(format_age(-10), "0s");
    }

    #[test]
    fn test_cache_status_lists_entries() {
        colored::control::set_override(false);
        let status = CacheStatus {
            file: PathBuf::from("packages_cache.json"),
            exists: true,
            entries: vec![CacheEntryStatus {
                query: "payment method".to_string(),
                package: "Pagos".to_string(),
                age_secs: 90,
                fresh: true,
            }],
        };

        let text = format_cache_status(&status);
        assert!(text.contains("Cache Status"));
        assert!(text.contains("1 fresh, 0 stale"));
        assert!(text.contains("payment method → Pagos  1m 30s (fresh)"));
    }

    #[test]
    fn test_package_marks_required_inputs() {
        colored::control::set_override(false);
        let package = PackageInfo::from_search_results(
            "q",
            &serde_json::json!({"results": [{
                "name": "Pagos",
                "version": "2.0",
                "inputs": [{"name": "amount", "type": "number"}, {"name": "note", "required": false}]
            }]}),
        );

        let text = format_package(&package);
        assert!(text.starts_with("Pagos 2.0"));
        assert!(text.contains("*amount (number)"));
        assert!(text.contains("  note (string)"));
    }
}
