//! Atomic synchronization actions

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comparison::PathIdentity;
use crate::rules::{ActionTemplate, DataPart};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionOperator {
    /// Copy content, leave the destination's last-write time as is
    SynchronizeContentOnly,
    /// Copy content and last-write time
    SynchronizeContentAndDate,
    /// Copy the last-write time only
    SynchronizeDate,
    /// Create a directory on the destination
    Create,
    /// Delete the entry on the destination
    Delete,
    /// Explicitly leave the item untouched
    DoNothing,
}

impl ActionOperator {
    /// Operators that transfer something from a source to a destination
    pub fn is_synchronize(&self) -> bool {
        matches!(
            self,
            ActionOperator::SynchronizeContentOnly
                | ActionOperator::SynchronizeContentAndDate
                | ActionOperator::SynchronizeDate
        )
    }
}

impl fmt::Display for ActionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionOperator::SynchronizeContentOnly => "synchronize-content-only",
            ActionOperator::SynchronizeContentAndDate => "synchronize-content-and-date",
            ActionOperator::SynchronizeDate => "synchronize-date",
            ActionOperator::Create => "create",
            ActionOperator::Delete => "delete",
            ActionOperator::DoNothing => "do-nothing",
        };
        write!(f, "{name}")
    }
}

/// A resolved synchronization instruction for one comparison item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicAction {
    pub id: Uuid,
    pub operator: ActionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DataPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<DataPart>,
    /// Item the action applies to
    pub path_identity: PathIdentity,
    /// Rule the action was derived from; `None` for manual actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<Uuid>,
}

impl AtomicAction {
    /// Instantiate a rule's action template for one item
    pub fn from_template(template: &ActionTemplate, path_identity: &PathIdentity, rule_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            operator: template.operator,
            source: template.source.clone(),
            destination: template.destination.clone(),
            path_identity: path_identity.clone(),
            rule_id: Some(rule_id),
        }
    }

    /// An action created by hand rather than by a rule
    pub fn manual(
        operator: ActionOperator,
        source: Option<DataPart>,
        destination: Option<DataPart>,
        path_identity: &PathIdentity,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            operator,
            source,
            destination,
            path_identity: path_identity.clone(),
            rule_id: None,
        }
    }

    pub fn is_from_rule(&self) -> bool {
        self.rule_id.is_some()
    }
}

impl fmt::Display for AtomicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operator)?;
        if let Some(source) = &self.source {
            write!(f, " {source}")?;
        }
        if let Some(destination) = &self.destination {
            write!(f, " -> {destination}")?;
        }
        write!(f, " ({})", self.path_identity.link_data)
    }
}
