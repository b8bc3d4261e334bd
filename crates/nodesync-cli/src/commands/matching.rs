//! Match command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use nodesync_core::{AtomicAction, ComparisonSession, InMemoryActionStore, RuleSet};
use serde::Serialize;

use super::{load_inventories, load_settings};
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ActionView<'a> {
    item: &'a str,
    operator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct MatchView<'a> {
    items: usize,
    removed: usize,
    accepted: Vec<ActionView<'a>>,
    rejected: Vec<ActionView<'a>>,
}

/// Run the match command
pub fn run_match(
    inventories: &[PathBuf],
    rules_path: &Path,
    settings: Option<&Path>,
    store_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let inventories = load_inventories(inventories)?;
    let rules = RuleSet::load(rules_path)?;

    let store = match store_path {
        Some(path) if path.exists() => InMemoryActionStore::load(path)?,
        _ => InMemoryActionStore::new(),
    };

    let mut session = ComparisonSession::new(settings, inventories.iter().map(|i| i.code.clone()));
    for inventory in inventories {
        session.add_inventory(inventory)?;
    }
    let outcome = session.run(&rules, &store)?;

    if let Some(path) = store_path {
        store.save(path)?;
        tracing::debug!(path = %path.display(), actions = store.len(), "Saved action store");
    }

    let report = &outcome.report;
    let view = MatchView {
        items: outcome.comparison.items.len(),
        removed: report.items.iter().map(|i| i.removed.len()).sum(),
        accepted: report
            .accepted()
            .map(|action| action_view(action, &rules, None))
            .collect(),
        rejected: report
            .rejected()
            .map(|(action, result)| {
                let reason = result.failure_reason.map(|r| r.to_string());
                action_view(action, &rules, reason)
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_text(&view, store_path);
    Ok(())
}

fn action_view<'a>(action: &'a AtomicAction, rules: &'a RuleSet, reason: Option<String>) -> ActionView<'a> {
    ActionView {
        item: &action.path_identity.link_data,
        operator: action.operator.to_string(),
        source: action.source.as_ref().map(ToString::to_string),
        destination: action.destination.as_ref().map(ToString::to_string),
        rule: action
            .rule_id
            .and_then(|id| rules.get(id))
            .map(|rule| rule.name.as_str()),
        reason,
    }
}

fn describe(action: &ActionView) -> String {
    let mut text = action.operator.clone();
    if let Some(source) = &action.source {
        text.push(' ');
        text.push_str(source);
    }
    if let Some(destination) = &action.destination {
        text.push_str(" -> ");
        text.push_str(destination);
    }
    text
}

fn print_text(view: &MatchView, store_path: Option<&Path>) {
    println!(
        "{} ({} items, {} previous rule actions replaced)",
        "Rule matching".bold(),
        view.items,
        view.removed
    );
    println!();

    if view.accepted.is_empty() && view.rejected.is_empty() {
        println!("  {}", "No rule produced an action".dimmed());
    }

    for action in &view.accepted {
        let rule = action.rule.unwrap_or("manual");
        println!(
            "  {} {} {} [{}]",
            "+".green(),
            action.item,
            describe(action).cyan(),
            rule.dimmed()
        );
    }
    for action in &view.rejected {
        println!(
            "  {} {} {}: {}",
            "x".red(),
            action.item,
            describe(action),
            action.reason.as_deref().unwrap_or("rejected").yellow()
        );
    }

    println!();
    println!(
        "{}: {} accepted, {} rejected",
        "Summary".bold(),
        view.accepted.len(),
        view.rejected.len()
    );
    if let Some(path) = store_path {
        println!("{}: {}", "Action store".dimmed(), path.display());
    }
}
