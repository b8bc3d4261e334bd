//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// nodesync - Compare node inventories and plan synchronization actions
#[derive(Parser, Debug)]
#[command(name = "nodesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compare inventory snapshots and show how each entry differs
    ///
    /// Examples:
    ///   nodesync compare inv-a.json inv-b.json
    ///   nodesync compare inv-*.json --settings session.toml --all
    Compare {
        /// Inventory snapshot files (.json, .toml or .yaml)
        #[arg(required = true)]
        inventories: Vec<PathBuf>,

        /// Session settings file; defaults to tree matching
        #[arg(short, long, env = "NODESYNC_SETTINGS")]
        settings: Option<PathBuf>,

        /// Also list entries that are in sync
        #[arg(long)]
        all: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Compare inventories, apply synchronization rules and show the actions
    ///
    /// Rule-derived actions replace those stored by a previous run; manual
    /// actions in the store are kept and checked against.
    ///
    /// Examples:
    ///   nodesync match inv-a.json inv-b.json --rules rules.toml
    ///   nodesync match inv-*.json --rules rules.toml --store actions.json
    Match {
        /// Inventory snapshot files (.json, .toml or .yaml)
        #[arg(required = true)]
        inventories: Vec<PathBuf>,

        /// Rule set file
        #[arg(short, long, env = "NODESYNC_RULES")]
        rules: PathBuf,

        /// Session settings file; defaults to tree matching
        #[arg(short, long, env = "NODESYNC_SETTINGS")]
        settings: Option<PathBuf>,

        /// Action store to load and update; created if missing
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Validate a rule set file and list its rules
    Rules {
        /// Rule set file
        file: PathBuf,

        /// Inventories whose codes the rules' data parts must resolve against
        #[arg(short, long = "inventory")]
        inventories: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compare_with_settings() {
        let cli = Cli::parse_from(["nodesync", "compare", "a.json", "b.json", "-s", "session.toml"]);
        assert_eq!(
            cli.command,
            Commands::Compare {
                inventories: vec![PathBuf::from("a.json"), PathBuf::from("b.json")],
                settings: Some(PathBuf::from("session.toml")),
                all: false,
                json: false,
            }
        );
    }

    #[test]
    fn test_parse_match_requires_rules() {
        let result = Cli::try_parse_from(["nodesync", "match", "a.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rules_with_inventories() {
        let cli = Cli::parse_from(["nodesync", "-v", "rules", "rules.toml", "-i", "a.json", "--json"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Rules {
                file: PathBuf::from("rules.toml"),
                inventories: vec![PathBuf::from("a.json")],
                json: true,
            }
        );
    }

    #[test]
    fn test_compare_requires_an_inventory() {
        assert!(Cli::try_parse_from(["nodesync", "compare"]).is_err());
    }
}
