//! Step tree error types

use thiserror::Error;

use super::location::StepLocationRelativeToParent;
use crate::domain::DomainError;

/// Errors raised when a tree mutation or shape check fails
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TreeError {
    #[error("Parent step not found: {0}")]
    ParentNotFound(String),

    #[error("Cannot insert {location} of step '{parent}'")]
    IncompatibleLocation {
        parent: String,
        location: StepLocationRelativeToParent,
    },

    #[error("Split step '{0}' requires a branch id")]
    MissingBranchId(String),

    #[error("Split step '{parent}' has no branch '{branch_id}'")]
    BranchNotFound { parent: String, branch_id: String },

    #[error("Duplicate step name: '{0}'")]
    DuplicateStepName(String),

    #[error("Duplicate step id: '{0}'")]
    DuplicateStepId(String),

    #[error("Trigger '{0}' can only be the root of a flow")]
    MisplacedTrigger(String),

    #[error("Root step '{0}' must be a trigger")]
    RootNotTrigger(String),
}

impl From<TreeError> for DomainError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::ParentNotFound(name) => DomainError::step_not_found(name),
            other => DomainError::validation(other.to_string()),
        }
    }
}
