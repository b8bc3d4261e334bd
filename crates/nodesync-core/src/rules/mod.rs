//! Declarative synchronization rules

mod condition;
mod data_part;
mod rule;
mod set;

pub(crate) use condition::compile_pattern;
pub use condition::{AtomicCondition, ComparisonProperty, ConditionOperand, ConditionOperator, SizeUnit};
pub use data_part::DataPart;
pub use rule::{ActionTemplate, ConditionMode, SynchronizationRule};
pub use set::RuleSet;
