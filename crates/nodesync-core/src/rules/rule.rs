//! Synchronization rule definition

use nodesync_meta::FileSystemType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AtomicCondition, DataPart};
use crate::Result;
use crate::actions::ActionOperator;

/// How the conditions of a rule combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionMode {
    /// Every condition must hold
    #[default]
    All,
    /// At least one condition must hold
    Any,
}

/// Action a rule produces when it matches an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub operator: ActionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DataPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<DataPart>,
}

impl ActionTemplate {
    pub fn new(operator: ActionOperator, source: Option<DataPart>, destination: Option<DataPart>) -> Self {
        Self {
            operator,
            source,
            destination,
        }
    }
}

/// A declarative rule: conditions over one item plus the actions to take
///
/// A rule only applies to items of its file-system type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynchronizationRule {
    /// Stable identifier, tags the actions derived from this rule
    pub id: Uuid,
    pub name: String,
    pub file_system_type: FileSystemType,
    #[serde(default)]
    pub condition_mode: ConditionMode,
    #[serde(default)]
    pub conditions: Vec<AtomicCondition>,
    #[serde(default)]
    pub actions: Vec<ActionTemplate>,
}

impl SynchronizationRule {
    pub fn new(name: impl Into<String>, file_system_type: FileSystemType) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            file_system_type,
            condition_mode: ConditionMode::All,
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_condition_mode(mut self, mode: ConditionMode) -> Self {
        self.condition_mode = mode;
        self
    }

    pub fn with_condition(mut self, condition: AtomicCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_action(mut self, action: ActionTemplate) -> Self {
        self.actions.push(action);
        self
    }

    /// Validate every condition of the rule
    pub fn validate(&self) -> Result<()> {
        self.conditions.iter().try_for_each(AtomicCondition::validate)
    }

    /// Data parts referenced by conditions and action templates
    pub fn data_parts(&self) -> impl Iterator<Item = &DataPart> {
        self.conditions
            .iter()
            .flat_map(AtomicCondition::data_parts)
            .chain(
                self.actions
                    .iter()
                    .flat_map(|a| a.source.iter().chain(a.destination.iter())),
            )
    }
}
