//! nodesync CLI
//!
//! Compares inventory snapshots taken on several nodes and plans the
//! synchronization actions implied by a rule set.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compare {
            inventories,
            settings,
            all,
            json,
        } => commands::run_compare(&inventories, settings.as_deref(), all, json),
        Commands::Match {
            inventories,
            rules,
            settings,
            store,
            json,
        } => commands::run_match(&inventories, &rules, settings.as_deref(), store.as_deref(), json),
        Commands::Rules {
            file,
            inventories,
            json,
        } => commands::run_rules(&file, &inventories, json),
    }
}

// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: bool) {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| e.to_string())
    };

    match result {
        Ok(()) if verbose => tracing::debug!("Verbose mode enabled"),
        Ok(()) => {}
        Err(e) => eprintln!("{}: failed to set up logging: {}", "warning".yellow().bold(), e),
    }
}
