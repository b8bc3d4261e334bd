//! [`TestWorkspace`] for tests that read fixtures from disk.

use std::path::{Path, PathBuf};

use nodesync_core::{InMemoryActionStore, RuleSet};
use nodesync_fs::ConfigStore;
use nodesync_meta::{Inventory, SessionSettings};
use tempfile::TempDir;

/// A temporary directory holding inventories, settings and rule sets.
///
/// # Example
///
/// ```rust
/// use nodesync_test_utils::{InventoryBuilder, PartBuilder, TestWorkspace};
///
/// let ws = TestWorkspace::new();
/// let path = ws.write_inventory(&InventoryBuilder::new("A").part(PartBuilder::directory("A1")).build());
/// assert!(path.exists());
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    ///
    /// # Panics
    /// Panics if the directory can't be created.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("TestWorkspace: failed to create temp dir: {e}")),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write `inventory` as `inventory-<code>.json`.
    pub fn write_inventory(&self, inventory: &Inventory) -> PathBuf {
        let path = self.path(&format!("inventory-{}.json", inventory.code));
        self.save(&path, inventory);
        path
    }

    /// Write `settings` as `settings.toml`.
    pub fn write_settings(&self, settings: &SessionSettings) -> PathBuf {
        let path = self.path("settings.toml");
        self.save(&path, settings);
        path
    }

    /// Write `rules` as `rules.toml`.
    ///
    /// # Panics
    /// Panics if the rule set can't be saved.
    pub fn write_rules(&self, rules: &RuleSet) -> PathBuf {
        let path = self.path("rules.toml");
        rules
            .save(&path)
            .unwrap_or_else(|e| panic!("write_rules: {e}"));
        path
    }

    /// Write `store` as `actions.json`.
    ///
    /// # Panics
    /// Panics if the store can't be saved.
    pub fn write_store(&self, store: &InMemoryActionStore) -> PathBuf {
        let path = self.path("actions.json");
        store
            .save(&path)
            .unwrap_or_else(|e| panic!("write_store: {e}"));
        path
    }

    fn save<T: serde::Serialize>(&self, path: &Path, value: &T) {
        ConfigStore::new()
            .save(path, value)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    }
}
