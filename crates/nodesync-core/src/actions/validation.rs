//! Outcome of validating a candidate action

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a candidate action was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    SourceRequired,
    DestinationRequired,
    SourceNotAllowedForDeleteOperation,
    SourceNotAllowedForCreateOperation,
    CreateOperationOnFileNotAllowed,
    CreateDestinationMustBeDirectoryPart,
    SynchronizeOperationOnDirectoryNotAllowed,
    SourceEqualsDestination,
    SourceNotFound,
    TargetNotPresent,
    SourceHasAnalysisError,
    AtLeastOneTargetsHasAnalysisError,
    SourceNotAccessible,
    AtLeastOneTargetsNotAccessible,
    NothingToCopyContentIdentical,
    NothingToCopyContentAndDateIdentical,
    TargetAlreadyUsed,
    SourceIsTargetOfAnotherAction,
    TargetIsSourceOfAnotherAction,
    DoNothingConflict,
    UnknownDataPart,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            FailureReason::SourceRequired => "a source is required",
            FailureReason::DestinationRequired => "a destination is required",
            FailureReason::SourceNotAllowedForDeleteOperation => "delete takes no source",
            FailureReason::SourceNotAllowedForCreateOperation => "create takes no source",
            FailureReason::CreateOperationOnFileNotAllowed => "create only applies to directories",
            FailureReason::CreateDestinationMustBeDirectoryPart => {
                "create needs a directory part as destination"
            }
            FailureReason::SynchronizeOperationOnDirectoryNotAllowed => {
                "directories can't be synchronized"
            }
            FailureReason::SourceEqualsDestination => "source and destination are the same",
            FailureReason::SourceNotFound => "source has no entry for this item",
            FailureReason::TargetNotPresent => "destination has no entry for this item",
            FailureReason::SourceHasAnalysisError => "source has an analysis error",
            FailureReason::AtLeastOneTargetsHasAnalysisError => {
                "at least one destination has an analysis error"
            }
            FailureReason::SourceNotAccessible => "source is not accessible",
            FailureReason::AtLeastOneTargetsNotAccessible => {
                "at least one destination is not accessible"
            }
            FailureReason::NothingToCopyContentIdentical => "content is already identical",
            FailureReason::NothingToCopyContentAndDateIdentical => {
                "content and date are already identical"
            }
            FailureReason::TargetAlreadyUsed => "destination is already targeted by another action",
            FailureReason::SourceIsTargetOfAnotherAction => {
                "source is the destination of another action"
            }
            FailureReason::TargetIsSourceOfAnotherAction => {
                "destination is the source of another action"
            }
            FailureReason::DoNothingConflict => "do-nothing can't be combined with other actions",
            FailureReason::UnknownDataPart => "data part is not part of the comparison",
        };
        write!(f, "{message}")
    }
}

/// Result of checking whether an action may be added for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub failure_reason: Option<FailureReason>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            failure_reason: None,
        }
    }

    pub fn failure(reason: FailureReason) -> Self {
        Self {
            is_valid: false,
            failure_reason: Some(reason),
        }
    }
}

impl From<std::result::Result<(), FailureReason>> for ValidationResult {
    fn from(result: std::result::Result<(), FailureReason>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(reason) => Self::failure(reason),
        }
    }
}
