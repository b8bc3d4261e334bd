//! Action repository boundary and the in-memory store
//!
//! The matcher only talks to [`AtomicActionRepository`]. Replacing the
//! rule-derived actions of an item goes through [`ActionBatch`] so that a
//! repository can apply the removal and the addition under one lock.

use std::path::Path;

use nodesync_fs::ConfigStore;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::AtomicAction;
use crate::Result;
use crate::comparison::PathIdentity;

/// Removals and additions to apply to a repository as one unit
#[derive(Debug, Clone, Default)]
pub struct ActionBatch {
    pub removed: Vec<AtomicAction>,
    pub added: Vec<AtomicAction>,
}

impl ActionBatch {
    pub fn new(removed: Vec<AtomicAction>, added: Vec<AtomicAction>) -> Self {
        Self { removed, added }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Storage of accepted actions
pub trait AtomicActionRepository: Send + Sync {
    /// Actions currently stored for an item
    fn get_atomic_actions(&self, path_identity: &PathIdentity) -> Vec<AtomicAction>;

    /// Insert actions, replacing stored actions with the same id
    fn add_or_update(&self, actions: Vec<AtomicAction>);

    /// Remove actions by id
    fn remove(&self, actions: &[AtomicAction]);

    /// Apply removals then additions
    ///
    /// Implementations shared between threads should override this so no
    /// reader observes the state between the two steps.
    fn apply_batch(&self, batch: ActionBatch) {
        self.remove(&batch.removed);
        self.add_or_update(batch.added);
    }
}

/// On-disk form of an action store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredActions {
    /// Format version for forward compatibility
    pub version: String,
    #[serde(default)]
    pub actions: Vec<AtomicAction>,
}

/// Thread-safe in-memory action repository
#[derive(Debug, Default)]
pub struct InMemoryActionStore {
    actions: RwLock<Vec<AtomicAction>>,
}

impl InMemoryActionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(actions: Vec<AtomicAction>) -> Self {
        Self {
            actions: RwLock::new(actions),
        }
    }

    /// Snapshot of every stored action, in insertion order
    pub fn all(&self) -> Vec<AtomicAction> {
        self.actions.read().clone()
    }

    pub fn len(&self) -> usize {
        self.actions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.read().is_empty()
    }

    /// Load a store saved by [`InMemoryActionStore::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let stored: StoredActions = ConfigStore::new().load(path)?;
        tracing::debug!(path = %path.display(), actions = stored.actions.len(), "Loaded action store");
        Ok(Self::with_actions(stored.actions))
    }

    /// Save the store atomically; the format follows the file extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let stored = StoredActions {
            version: "1.0".to_string(),
            actions: self.all(),
        };
        ConfigStore::new().save(path, &stored)?;
        Ok(())
    }
}

fn remove_from(actions: &mut Vec<AtomicAction>, removed: &[AtomicAction]) {
    actions.retain(|a| !removed.iter().any(|r| r.id == a.id));
}

fn upsert_into(actions: &mut Vec<AtomicAction>, added: Vec<AtomicAction>) {
    for action in added {
        match actions.iter_mut().find(|a| a.id == action.id) {
            Some(existing) => *existing = action,
            None => actions.push(action),
        }
    }
}

impl AtomicActionRepository for InMemoryActionStore {
    fn get_atomic_actions(&self, path_identity: &PathIdentity) -> Vec<AtomicAction> {
        self.actions
            .read()
            .iter()
            .filter(|a| &a.path_identity == path_identity)
            .cloned()
            .collect()
    }

    fn add_or_update(&self, actions: Vec<AtomicAction>) {
        upsert_into(&mut self.actions.write(), actions);
    }

    fn remove(&self, actions: &[AtomicAction]) {
        remove_from(&mut self.actions.write(), actions);
    }

    fn apply_batch(&self, batch: ActionBatch) {
        let mut actions = self.actions.write();
        remove_from(&mut actions, &batch.removed);
        upsert_into(&mut actions, batch.added);
    }
}
