//! Rules command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use nodesync_core::RuleSet;

use super::load_inventories;
use crate::error::Result;

/// Run the rules command
///
/// Loading validates every condition. With inventories given, the rules'
/// data parts must also resolve against them.
pub fn run_rules(file: &Path, inventories: &[PathBuf], json: bool) -> Result<()> {
    let rules = RuleSet::load(file)?;

    if !inventories.is_empty() {
        let inventories = load_inventories(inventories)?;
        rules.check_data_parts(&inventories)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("{} ({})", "Synchronization Rules".bold(), file.display());
    println!();

    if rules.is_empty() {
        println!("  {}", "None".dimmed());
        return Ok(());
    }

    for rule in rules.rules() {
        println!(
            "  {} {} ({}, {})",
            "+".green(),
            rule.name.cyan(),
            rule.file_system_type,
            format!("{:?}", rule.condition_mode).to_lowercase()
        );
        for condition in &rule.conditions {
            println!("      {} {}", "if".dimmed(), condition);
        }
        for action in &rule.actions {
            let mut text = action.operator.to_string();
            if let Some(source) = &action.source {
                text.push_str(&format!(" {source}"));
            }
            if let Some(destination) = &action.destination {
                text.push_str(&format!(" -> {destination}"));
            }
            println!("      {} {}", "do".dimmed(), text);
        }
    }

    println!();
    println!("{} rules, all valid", rules.len());
    Ok(())
}
