//! Atomic actions, their validation and storage

mod action;
mod checker;
mod store;
mod validation;

pub use action::{ActionOperator, AtomicAction};
pub use checker::{ApplicableActions, AtomicActionConsistencyChecker};
pub use store::{ActionBatch, AtomicActionRepository, InMemoryActionStore, StoredActions};
pub use validation::{FailureReason, ValidationResult};
