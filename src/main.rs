use clap::Parser;
use colored::{control::set_override, Colorize};
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use bizflow::cli::args::{Cli, Commands, CompletionsArgs};
use bizflow::cli::commands;
use bizflow::config::Config;
use bizflow::error::WizardError;

/// Exit code for Ctrl-C
const INTERRUPTED: i32 = 130;

fn main() {
    // Respect NO_COLOR environment variable (https://no-color.org/)
    // Also disable colors when stdout is not a terminal (for piping)
    if std::env::var("NO_COLOR").is_ok() || !std::io::stdout().is_terminal() {
        set_override(false);
    }

    // The wizard blocks on stdin, so Ctrl-C ends the process directly
    ctrlc::set_handler(|| {
        eprintln!();
        std::process::exit(INTERRUPTED);
    })
    .ok();

    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<(), WizardError> {
    let cli = Cli::parse();
    let format = cli.output;

    // Handle completions command early (no config needed)
    if let Commands::Completions(CompletionsArgs { shell }) = &cli.command {
        Cli::print_completions(*shell);
        return Ok(());
    }

    init_logging(cli.log_level());

    let config = Config::load()?;

    let output = match &cli.command {
        Commands::Run(args) => commands::run(&config, args, format)?,
        Commands::Packages(args) => commands::packages(&config, args, format)?,
        Commands::Search(args) => commands::search(&config, args, format)?,
        Commands::Cache(args) => commands::cache(&config, args, format)?,
        Commands::Config(args) => commands::config(&config, args, format)?,
        Commands::Completions(_) => unreachable!(), // Handled above
    };

    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
