use crate::Result;
use crate::comparison::ComparisonItem;
use crate::rules::{AtomicCondition, ConditionOperand, ConditionOperator, compile_pattern};

use super::{invalid_operand, unsupported};

/// Glob match of the item's name, case-insensitive
pub fn matches_name(condition: &AtomicCondition, item: &ComparisonItem) -> Result<bool> {
    let ConditionOperand::NamePattern { pattern } = &condition.destination else {
        return Err(invalid_operand(condition, "a name pattern is required"));
    };
    let is_match = compile_pattern(pattern)?.is_match(&item.path_identity().file_name);

    match condition.operator {
        ConditionOperator::Equals => Ok(is_match),
        ConditionOperator::NotEquals => Ok(!is_match),
        _ => Err(unsupported(condition)),
    }
}
