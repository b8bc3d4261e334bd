//! Inventory comparison and synchronization rule engine for nodesync.
//!
//! The pipeline runs in three steps:
//!
//! 1. [`InventoryComparer`] merges the inventories of every node into
//!    [`ComparisonItem`]s and computes their status.
//! 2. [`SynchronizationRuleMatcher`] evaluates [`SynchronizationRule`]s
//!    against each item and builds candidate [`AtomicAction`]s.
//! 3. [`AtomicActionConsistencyChecker`] validates the candidates; accepted
//!    actions replace the item's previous rule-derived actions in an
//!    [`AtomicActionRepository`].
//!
//! [`ComparisonSession`] drives the pipeline once all inventories are in.

pub mod actions;
pub mod comparison;
pub mod error;
pub mod matching;
pub mod rules;
pub mod session;

pub use actions::{
    ActionBatch, ActionOperator, ApplicableActions, AtomicAction, AtomicActionConsistencyChecker,
    AtomicActionRepository, FailureReason, InMemoryActionStore, StoredActions, ValidationResult,
};
pub use comparison::{
    ComparisonItem, ComparisonResult, ContentCore, ContentIdentity, ContentIdentityCore,
    ContentRepartition, EntryDescription, InitialStatusBuilder, InventoryComparer, PathIdentity,
};
pub use error::{Error, Result};
pub use matching::{ItemMatch, MatchReport, SynchronizationRuleMatcher};
pub use rules::{
    ActionTemplate, AtomicCondition, ComparisonProperty, ConditionMode, ConditionOperand,
    ConditionOperator, DataPart, RuleSet, SizeUnit, SynchronizationRule,
};
pub use session::{ComparisonSession, SessionOutcome, SessionState};
