//! Condition matchers, one pure function per compared property
//!
//! Every matcher returns `Ok(false)` for states the item can't answer
//! (missing identity, unknown content, unreadable part) and an error only for
//! conditions the engine can't evaluate at all.

mod content;
mod date;
mod name;
mod presence;
mod size;

pub use content::matches_content;
pub use date::matches_date;
pub use name::matches_name;
pub use presence::matches_presence;
pub use size::matches_size;

use nodesync_meta::Inventory;

use crate::comparison::ComparisonItem;
use crate::rules::{AtomicCondition, ComparisonProperty};
use crate::{Error, Result};

/// Evaluate one condition against one item
///
/// # Errors
///
/// `UnsupportedOperator` when the operator does not apply to the compared
/// property, `InvalidCondition` or `InvalidPattern` for malformed operands.
pub fn evaluate(condition: &AtomicCondition, item: &ComparisonItem, inventories: &[Inventory]) -> Result<bool> {
    check_operator(condition)?;
    let matched = match condition.property {
        ComparisonProperty::Name => matches_name(condition, item)?,
        ComparisonProperty::Size => matches_size(condition, item)?,
        ComparisonProperty::Date => matches_date(condition, item, inventories)?,
        ComparisonProperty::Content => matches_content(condition, item)?,
        ComparisonProperty::Presence => matches_presence(condition, item)?,
    };
    tracing::trace!(
        item = %item.path_identity().link_data,
        property = %condition.property,
        operator = %condition.operator,
        matched,
        "condition evaluated"
    );
    Ok(matched)
}

fn check_operator(condition: &AtomicCondition) -> Result<()> {
    if condition.property.supports(condition.operator) {
        Ok(())
    } else {
        Err(unsupported(condition))
    }
}

pub(crate) fn unsupported(condition: &AtomicCondition) -> Error {
    Error::UnsupportedOperator {
        property: condition.property.to_string(),
        operator: condition.operator.to_string(),
    }
}

pub(crate) fn invalid_operand(condition: &AtomicCondition, message: &str) -> Error {
    Error::InvalidCondition {
        property: condition.property.to_string(),
        message: message.to_string(),
    }
}
