use crate::Result;
use crate::comparison::ComparisonItem;
use crate::rules::{AtomicCondition, ConditionOperand, ConditionOperator, DataPart};

use super::{invalid_operand, unsupported};

/// Whether the item exists on the source and, if given, on the destination
///
/// Placeholders for unreadable parts count as present.
pub fn matches_presence(condition: &AtomicCondition, item: &ComparisonItem) -> Result<bool> {
    let on_source = exists_on(item, &condition.source);
    let on_destination = match &condition.destination {
        ConditionOperand::DataPart { data_part } => Some(exists_on(item, data_part)),
        ConditionOperand::None => None,
        _ => return Err(invalid_operand(condition, "a data part or nothing is required")),
    };

    match (condition.operator, on_destination) {
        (ConditionOperator::ExistsOn, Some(on_destination)) => Ok(on_source && on_destination),
        (ConditionOperator::ExistsOn, None) => Ok(on_source),
        (ConditionOperator::NotExistsOn, Some(on_destination)) => Ok(on_source && !on_destination),
        (ConditionOperator::NotExistsOn, None) => Ok(!on_source),
        _ => Err(unsupported(condition)),
    }
}

fn exists_on(item: &ComparisonItem, data_part: &DataPart) -> bool {
    item.content_identities()
        .iter()
        .any(|ci| ci.parts().any(|p| data_part.matches(p)))
}
