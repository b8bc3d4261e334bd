use chrono::{DateTime, Timelike, Utc};
use nodesync_meta::Inventory;

use crate::Result;
use crate::comparison::ComparisonItem;
use crate::matching::localization::{localize, matching_parts, resolve_parts};
use crate::rules::{AtomicCondition, ConditionOperand, ConditionOperator, DataPart};

use super::{invalid_operand, unsupported};

/// Compare the source last-write time with another data part or a literal date
///
/// A destination part that was only partially scanned never satisfies the
/// condition.
pub fn matches_date(condition: &AtomicCondition, item: &ComparisonItem, inventories: &[Inventory]) -> Result<bool> {
    let source = last_write_time(item, &condition.source);
    let destination = match &condition.destination {
        ConditionOperand::DataPart { data_part } => {
            let incomplete = resolve_parts(data_part, inventories)
                .iter()
                .any(|(_, part)| part.is_incomplete_due_to_access);
            if incomplete {
                return Ok(false);
            }
            last_write_time(item, data_part)
        }
        ConditionOperand::DateTime { value } => {
            return compare(condition, source.map(truncate), Some(truncate(*value)));
        }
        _ => return Err(invalid_operand(condition, "a data part or a date is required")),
    };

    compare(condition, source, destination)
}

fn compare(
    condition: &AtomicCondition,
    source: Option<DateTime<Utc>>,
    destination: Option<DateTime<Utc>>,
) -> Result<bool> {
    let (Some(source), Some(destination)) = (source, destination) else {
        return Ok(false);
    };
    match condition.operator {
        ConditionOperator::Equals => Ok(source == destination),
        ConditionOperator::NotEquals => Ok(source != destination),
        ConditionOperator::IsNewerThan => Ok(source > destination),
        ConditionOperator::IsOlderThan => Ok(source < destination),
        _ => Err(unsupported(condition)),
    }
}

fn last_write_time(item: &ComparisonItem, data_part: &DataPart) -> Option<DateTime<Utc>> {
    let identity = localize(item, data_part)?;
    matching_parts(identity, data_part).find_map(|p| identity.last_write_time(p))
}

fn truncate(time: DateTime<Utc>) -> DateTime<Utc> {
    time.with_nanosecond(0).unwrap_or(time)
}
