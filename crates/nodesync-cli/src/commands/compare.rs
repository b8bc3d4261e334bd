//! Compare command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use nodesync_core::{ComparisonItem, ComparisonResult, InventoryComparer};
use nodesync_meta::{FileSystemType, SessionSettings};
use serde::Serialize;

use super::{load_inventories, load_settings};
use crate::error::Result;

/// JSON view of one comparison item
#[derive(Debug, Serialize)]
struct ItemView<'a> {
    path: &'a str,
    file_system_type: FileSystemType,
    in_sync: bool,
    missing_inventories: Vec<&'a str>,
    missing_parts: Vec<&'a str>,
    content_groups: Vec<ContentGroupView<'a>>,
    access_issues: Vec<&'a str>,
    same_time_different_content: bool,
    needs_full_analysis: bool,
}

#[derive(Debug, Serialize)]
struct ContentGroupView<'a> {
    hash: Option<&'a str>,
    size: u64,
    parts: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct CompareView<'a> {
    settings: &'a SessionSettings,
    inventories: Vec<&'a str>,
    items: Vec<ItemView<'a>>,
}

/// Run the compare command
pub fn run_compare(inventories: &[PathBuf], settings: Option<&Path>, all: bool, json: bool) -> Result<()> {
    let settings = load_settings(settings)?;
    let inventories = load_inventories(inventories)?;
    let result = InventoryComparer::new(settings).compare(inventories)?;

    let items: Vec<ItemView> = result
        .items
        .iter()
        .map(|item| item_view(item, &settings))
        .filter(|view| all || !view.in_sync)
        .collect();

    if json {
        let view = CompareView {
            settings: &settings,
            inventories: result.inventories.iter().map(|i| i.code.as_str()).collect(),
            items,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_text(&result, &settings, &items);
    Ok(())
}

fn item_view<'a>(item: &'a ComparisonItem, settings: &SessionSettings) -> ItemView<'a> {
    let repartition = item.content_repartition();
    let access_issues: Vec<&str> = item
        .access_issue_parts()
        .into_iter()
        .map(|p| p.part.as_str())
        .collect();

    ItemView {
        path: &item.path_identity().link_data,
        file_system_type: item.file_system_type(),
        in_sync: repartition.is_in_sync() && access_issues.is_empty(),
        missing_inventories: repartition.missing_inventories.iter().map(String::as_str).collect(),
        missing_parts: repartition.missing_parts.iter().map(|p| p.part.as_str()).collect(),
        content_groups: repartition
            .fingerprint_groups
            .iter()
            .map(|(core, parts)| ContentGroupView {
                hash: core.hash.as_deref(),
                size: core.size,
                parts: parts.iter().map(|p| p.part.as_str()).collect(),
            })
            .collect(),
        access_issues,
        same_time_different_content: repartition.has_same_time_different_content(),
        needs_full_analysis: item.needs_full_analysis(settings.analysis_mode),
    }
}

fn print_text(result: &ComparisonResult, settings: &SessionSettings, items: &[ItemView]) {
    println!(
        "{} ({} matching, {} inventories, {} items)",
        "Comparison".bold(),
        settings.matching_mode.to_string().cyan(),
        result.inventories.len(),
        result.items.len()
    );
    println!();

    if items.is_empty() {
        println!("  {}", "Everything is in sync".green());
        println!();
    }

    for item in items {
        let mut notes = Vec::new();
        if !item.missing_inventories.is_empty() {
            notes.push(format!("missing on {}", item.missing_inventories.join(", ")));
        }
        if item.content_groups.len() > 1 {
            let groups: Vec<String> = item.content_groups.iter().map(|g| g.parts.join(" ")).collect();
            notes.push(format!("{} contents: {}", item.content_groups.len(), groups.join(" | ")));
        }
        if !item.access_issues.is_empty() {
            notes.push(format!("access issues on {}", item.access_issues.join(", ")));
        }
        if item.same_time_different_content {
            notes.push("same date, different content".to_string());
        }

        let marker = if item.in_sync {
            "=".green()
        } else if !item.access_issues.is_empty() {
            "!".red()
        } else if !item.missing_inventories.is_empty() {
            "-".yellow()
        } else {
            "~".yellow()
        };
        println!(
            "  {} {} ({}) {}",
            marker,
            item.path,
            item.file_system_type.to_string().dimmed(),
            notes.join("; ")
        );
    }

    let differing = result
        .items
        .iter()
        .filter(|item| !item.content_repartition().is_in_sync() || !item.access_issue_parts().is_empty())
        .count();
    let analysis = result.items_needing_full_analysis(settings.analysis_mode).len();
    println!();
    println!(
        "{}: {} differ, {} in sync, {} need a full analysis",
        "Summary".bold(),
        differing,
        result.items.len() - differing,
        analysis
    );
}
