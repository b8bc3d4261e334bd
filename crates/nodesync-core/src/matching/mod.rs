//! Rule matching: condition evaluation, localization and the rule matcher

pub mod conditions;
pub mod localization;
mod matcher;

pub use matcher::{ItemMatch, MatchReport, SynchronizationRuleMatcher};
