//! Builders for synchronization rules.

use nodesync_core::{
    ActionOperator, ActionTemplate, AtomicCondition, ComparisonProperty, ConditionMode,
    ConditionOperand, ConditionOperator, DataPart, SizeUnit, SynchronizationRule,
};
use nodesync_meta::{FileSystemType, PartRef};

use crate::inventory::ts;

/// Data part covering a whole inventory.
pub fn data_part(inventory: &str) -> DataPart {
    DataPart::for_inventory(inventory)
}

/// Data part covering one inventory part.
pub fn inventory_part(inventory: &str, part: &str) -> DataPart {
    DataPart::for_part(&PartRef::new(inventory, part))
}

/// Builds a [`SynchronizationRule`] condition by condition.
///
/// # Example
///
/// ```rust
/// use nodesync_test_utils::{RuleBuilder, data_part};
///
/// let rule = RuleBuilder::files("mirror")
///     .content_differs(data_part("A"), data_part("B"))
///     .copy_content(data_part("A"), data_part("B"))
///     .build();
/// assert_eq!(rule.conditions.len(), 1);
/// ```
pub struct RuleBuilder {
    rule: SynchronizationRule,
}

impl RuleBuilder {
    pub fn files(name: &str) -> Self {
        Self {
            rule: SynchronizationRule::new(name, FileSystemType::File),
        }
    }

    pub fn directories(name: &str) -> Self {
        Self {
            rule: SynchronizationRule::new(name, FileSystemType::Directory),
        }
    }

    pub fn any(mut self) -> Self {
        self.rule.condition_mode = ConditionMode::Any;
        self
    }

    pub fn condition(
        mut self,
        source: DataPart,
        property: ComparisonProperty,
        operator: ConditionOperator,
        operand: ConditionOperand,
    ) -> Self {
        self.rule
            .conditions
            .push(AtomicCondition::new(source, property, operator, operand));
        self
    }

    pub fn name_matches(self, pattern: &str) -> Self {
        self.condition(
            data_part("A"),
            ComparisonProperty::Name,
            ConditionOperator::Equals,
            ConditionOperand::NamePattern {
                pattern: pattern.to_string(),
            },
        )
    }

    pub fn content_differs(self, source: DataPart, destination: DataPart) -> Self {
        self.condition(
            source,
            ComparisonProperty::Content,
            ConditionOperator::NotEquals,
            destination.into(),
        )
    }

    pub fn exists_on(self, source: DataPart) -> Self {
        self.condition(
            source,
            ComparisonProperty::Presence,
            ConditionOperator::ExistsOn,
            ConditionOperand::None,
        )
    }

    pub fn missing_on(self, source: DataPart, destination: DataPart) -> Self {
        self.condition(
            source,
            ComparisonProperty::Presence,
            ConditionOperator::NotExistsOn,
            destination.into(),
        )
    }

    pub fn bigger_than(self, source: DataPart, value: u64, unit: SizeUnit) -> Self {
        self.condition(
            source,
            ComparisonProperty::Size,
            ConditionOperator::IsBiggerThan,
            ConditionOperand::Size { value, unit },
        )
    }

    pub fn newer_than_secs(self, source: DataPart, secs: i64) -> Self {
        self.condition(
            source,
            ComparisonProperty::Date,
            ConditionOperator::IsNewerThan,
            ConditionOperand::DateTime { value: ts(secs) },
        )
    }

    pub fn action(mut self, operator: ActionOperator, source: Option<DataPart>, destination: Option<DataPart>) -> Self {
        self.rule
            .actions
            .push(ActionTemplate::new(operator, source, destination));
        self
    }

    pub fn copy_content(self, source: DataPart, destination: DataPart) -> Self {
        self.action(ActionOperator::SynchronizeContentOnly, Some(source), Some(destination))
    }

    pub fn delete_on(self, destination: DataPart) -> Self {
        self.action(ActionOperator::Delete, None, Some(destination))
    }

    pub fn do_nothing(self) -> Self {
        self.action(ActionOperator::DoNothing, None, None)
    }

    pub fn build(self) -> SynchronizationRule {
        self.rule
    }
}
