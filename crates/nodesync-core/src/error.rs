//! Error types for nodesync-core

/// Result type for nodesync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in nodesync-core operations
///
/// Validation failures of candidate actions are not errors; they are reported
/// as [`crate::actions::ValidationResult`] values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rule combines a compared property with an operator the engine does not support
    #[error("Operator {operator} is not supported for {property} conditions")]
    UnsupportedOperator { property: String, operator: String },

    /// A condition is missing an operand or carries one of the wrong kind
    #[error("Invalid {property} condition: {message}")]
    InvalidCondition { property: String, message: String },

    /// A name pattern could not be compiled
    #[error("Invalid name pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A data part names an inventory or part absent from the comparison
    #[error("Unknown data part: {name}")]
    UnknownDataPart { name: String },

    /// Two inventories (or parts) share the same code
    #[error("Duplicate inventory code: {code}")]
    DuplicateInventoryCode { code: String },

    /// An inventory was supplied that the session does not expect
    #[error("Unexpected inventory: {code}")]
    UnexpectedInventory { code: String },

    /// A session operation was called in the wrong state
    #[error("Invalid session state: expected {expected}, found {actual}")]
    InvalidSessionState { expected: String, actual: String },

    /// Filesystem error from nodesync-fs
    #[error(transparent)]
    Fs(#[from] nodesync_fs::Error),

    /// Metadata error from nodesync-meta
    #[error(transparent)]
    Meta(#[from] nodesync_meta::Error),
}
