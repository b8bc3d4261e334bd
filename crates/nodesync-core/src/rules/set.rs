//! Ordered rule sets
//!
//! A rule set is persisted through [`ConfigStore`], so its format follows
//! the file extension (TOML by convention).

use std::path::Path;

use nodesync_fs::ConfigStore;
use nodesync_meta::Inventory;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SynchronizationRule;
use crate::{Error, Result};

/// Ordered list of rules; earlier rules take precedence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Format version for forward compatibility
    version: String,
    #[serde(default)]
    rules: Vec<SynchronizationRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            rules: Vec::new(),
        }
    }

    /// Load and validate a rule set
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed, or if any
    /// condition is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let set: RuleSet = ConfigStore::new().load(path)?;
        set.validate()?;
        tracing::debug!(path = %path.display(), rules = set.rules.len(), "Loaded rule set");
        Ok(set)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Validate and append a rule
    pub fn add(&mut self, rule: SynchronizationRule) -> Result<&SynchronizationRule> {
        rule.validate()?;
        self.rules.push(rule);
        let index = self.rules.len() - 1;
        Ok(&self.rules[index])
    }

    pub fn get(&self, id: Uuid) -> Option<&SynchronizationRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Get a rule by name
    ///
    /// If several rules share the name, returns the first one.
    pub fn get_by_name(&self, name: &str) -> Option<&SynchronizationRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Remove a rule by id
    ///
    /// Returns the removed rule if found.
    pub fn remove(&mut self, id: Uuid) -> Option<SynchronizationRule> {
        let pos = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(pos))
    }

    pub fn rules(&self) -> &[SynchronizationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate every rule's conditions
    pub fn validate(&self) -> Result<()> {
        self.rules.iter().try_for_each(SynchronizationRule::validate)
    }

    /// Check that every data part used by the rules exists in `inventories`
    pub fn check_data_parts(&self, inventories: &[Inventory]) -> Result<()> {
        for rule in &self.rules {
            for data_part in rule.data_parts() {
                data_part.resolve(inventories).map_err(|_| Error::UnknownDataPart {
                    name: format!("{data_part} (rule '{}')", rule.name),
                })?;
            }
        }
        Ok(())
    }
}

impl From<Vec<SynchronizationRule>> for RuleSet {
    fn from(rules: Vec<SynchronizationRule>) -> Self {
        Self {
            rules,
            ..Self::new()
        }
    }
}
