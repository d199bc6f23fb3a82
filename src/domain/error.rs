use thiserror::Error;

/// Core domain errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Flow version '{version_id}' is locked")]
    LockedVersion { version_id: String },

    #[error("Flow version '{version_id}' has been updated by another user")]
    StaleUpdate { version_id: String },

    #[error("Step not found: {step_name}")]
    StepNotFound { step_name: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn locked_version(version_id: impl Into<String>) -> Self {
        Self::LockedVersion {
            version_id: version_id.into(),
        }
    }

    pub fn stale_update(version_id: impl Into<String>) -> Self {
        Self::StaleUpdate {
            version_id: version_id.into(),
        }
    }

    pub fn step_not_found(step_name: impl Into<String>) -> Self {
        Self::StepNotFound {
            step_name: step_name.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether the caller can recover by re-fetching and resubmitting
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleUpdate { .. })
    }
}
