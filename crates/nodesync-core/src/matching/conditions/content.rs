use crate::Result;
use crate::comparison::{ComparisonItem, ContentIdentity};
use crate::matching::localization::{localize, matching_parts};
use crate::rules::{AtomicCondition, ConditionOperand, ConditionOperator, DataPart};

use super::{invalid_operand, unsupported};

/// Compare the content cores located for the source and destination
///
/// Two absent sides are equal; one absent side differs from a present one.
/// A present side that can't be trusted (unknown content, analysis error,
/// access issue) makes the condition false.
pub fn matches_content(condition: &AtomicCondition, item: &ComparisonItem) -> Result<bool> {
    let ConditionOperand::DataPart { data_part } = &condition.destination else {
        return Err(invalid_operand(condition, "a destination data part is required"));
    };
    let equals = match condition.operator {
        ConditionOperator::Equals => true,
        ConditionOperator::NotEquals => false,
        _ => return Err(unsupported(condition)),
    };

    let source = localize(item, &condition.source);
    let destination = localize(item, data_part);

    let untrusted = source.is_some_and(|ci| !is_trusted(ci, &condition.source))
        || destination.is_some_and(|ci| !is_trusted(ci, data_part));
    if untrusted {
        return Ok(false);
    }

    let same = match (source, destination) {
        (None, None) => true,
        (Some(source), Some(destination)) => source.core() == destination.core(),
        _ => false,
    };
    Ok(same == equals)
}

fn is_trusted(identity: &ContentIdentity, data_part: &DataPart) -> bool {
    identity.core().is_known()
        && matching_parts(identity, data_part)
            .all(|p| !identity.has_analysis_error(p) && !identity.has_access_issue(p))
}
