use crate::Result;
use crate::comparison::{ComparisonItem, ContentIdentity};
use crate::matching::localization::localize;
use crate::rules::{AtomicCondition, ConditionOperand, ConditionOperator};

use super::{invalid_operand, unsupported};

/// Compare the source size with another data part or a literal size
pub fn matches_size(condition: &AtomicCondition, item: &ComparisonItem) -> Result<bool> {
    let source = localize(item, &condition.source).and_then(identity_size);
    let destination = match &condition.destination {
        ConditionOperand::DataPart { data_part } => localize(item, data_part).and_then(identity_size),
        ConditionOperand::Size { value, unit } => Some(unit.to_bytes(*value)),
        _ => return Err(invalid_operand(condition, "a data part or a size is required")),
    };

    let (Some(source), Some(destination)) = (source, destination) else {
        return Ok(false);
    };

    match condition.operator {
        ConditionOperator::Equals => Ok(source == destination),
        ConditionOperator::NotEquals => Ok(source != destination),
        ConditionOperator::IsBiggerThan => Ok(source > destination),
        ConditionOperator::IsSmallerThan => Ok(source < destination),
        _ => Err(unsupported(condition)),
    }
}

fn identity_size(identity: &ContentIdentity) -> Option<u64> {
    identity.core().known().map(|core| core.size)
}
