use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// Interview a business owner and draft a chat-agent workflow
#[derive(Parser)]
#[command(name = "bizflow")]
#[command(version, propagate_version = true)]
#[command(about = "Interview a business owner and draft a chat-agent workflow from reusable packages")]
pub struct Cli {
    /// Output format for command results
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Write shell completions to stdout
    pub fn print_completions(shell: Shell) {
        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    }

    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human-readable output
    #[default]
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive wizard
    #[command(alias = "r")]
    Run(RunArgs),

    /// Show the packages the wizard works with
    #[command(alias = "p")]
    Packages(PackagesArgs),

    /// Search the package catalog
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Inspect or clear the package cache
    Cache(CacheArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Skip the interview and read the business description from a file
    #[arg(short, long)]
    pub transcript: Option<PathBuf>,

    /// Save the result summary to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Package cache file (overrides config)
    #[arg(long)]
    pub cache_file: Option<PathBuf>,
}

/// Arguments for the packages command
#[derive(Args)]
pub struct PackagesArgs {
    /// Ignore cached entries and search again
    #[arg(short, long)]
    pub refresh: bool,

    /// Package cache file (overrides config)
    #[arg(long)]
    pub cache_file: Option<PathBuf>,
}

/// Arguments for the search command
#[derive(Args)]
pub struct SearchArgs {
    /// Free-text package query
    pub query: String,

    /// Package cache file (overrides config)
    #[arg(long)]
    pub cache_file: Option<PathBuf>,
}

/// Arguments for the cache command
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,

    /// Package cache file (overrides config)
    #[arg(long, global = true)]
    pub cache_file: Option<PathBuf>,
}

/// Cache subcommands
#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cached queries and their age
    Status,
    /// Remove every cached entry
    Clear,
}

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., llm.provider)
        key: String,
        /// Value to set
        value: String,
    },
    /// Show configuration file path
    Path,
    /// Initialize configuration interactively
    Init,
}

/// Arguments for the completions command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
