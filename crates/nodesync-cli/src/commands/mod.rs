//! Command implementations for nodesync-cli

pub mod compare;
pub mod matching;
pub mod rules;

use std::path::{Path, PathBuf};

use nodesync_meta::{Inventory, SessionSettings};

use crate::error::{CliError, Result};

pub use compare::run_compare;
pub use matching::run_match;
pub use rules::run_rules;

/// Load settings from `path`, or the tree-matching defaults
fn load_settings(path: Option<&Path>) -> Result<SessionSettings> {
    match path {
        Some(path) => {
            ensure_exists(path, "Settings")?;
            Ok(nodesync_meta::load_settings(path)?)
        }
        None => Ok(SessionSettings::default()),
    }
}

fn load_inventories(paths: &[PathBuf]) -> Result<Vec<Inventory>> {
    for path in paths {
        ensure_exists(path, "Inventory")?;
    }
    Ok(nodesync_meta::load_inventories(paths)?)
}

fn ensure_exists(path: &Path, what: &str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::user(format!("{what} file not found: {}", path.display())))
    }
}
