//! Validated identifiers for flows, versions and projects

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::storage::StorageKey;

/// Maximum length for entity identifiers
pub const MAX_ID_LENGTH: usize = 64;

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9_-]*[A-Za-z0-9])?$").unwrap());

/// Identifier validation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IdValidationError {
    #[error("ID cannot be empty")]
    Empty,

    #[error("ID too long: {length} characters (max {max})")]
    TooLong { length: usize, max: usize },

    #[error("Invalid ID format '{0}': must be alphanumeric with hyphens or underscores")]
    InvalidFormat(String),
}

/// Validate an entity identifier
pub fn validate_id(id: &str) -> Result<(), IdValidationError> {
    if id.is_empty() {
        return Err(IdValidationError::Empty);
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(IdValidationError::TooLong {
            length: id.len(),
            max: MAX_ID_LENGTH,
        });
    }

    if !ID_PATTERN.is_match(id) {
        return Err(IdValidationError::InvalidFormat(id.to_string()));
    }

    Ok(())
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Result<Self, IdValidationError> {
                let id = id.into();
                validate_id(&id)?;
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl StorageKey for $name {
            fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Logical flow identifier
    FlowId
);

entity_id!(
    /// Identifier of one version of a flow
    FlowVersionId
);

entity_id!(
    /// Project (tenant) identifier; the authorization scope of every request
    ProjectId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(FlowId::new("flow-1").is_ok());
        assert!(FlowVersionId::new("3f2a9c1e-8a4b-4f0e-9d7c-0b1e2d3c4f5a").is_ok());
        assert!(ProjectId::new("project_alpha").is_ok());
    }

    #[test]
    fn test_invalid_ids() {
        assert_eq!(FlowId::new(""), Err(IdValidationError::Empty));
        assert!(matches!(FlowId::new("-flow"), Err(IdValidationError::InvalidFormat(_))));
        assert!(matches!(FlowId::new("has space"), Err(IdValidationError::InvalidFormat(_))));
        assert!(matches!(
            FlowId::new("a".repeat(MAX_ID_LENGTH + 1)),
            Err(IdValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_id_serde_validates() {
        let id: FlowId = serde_json::from_str("\"flow-1\"").unwrap();
        assert_eq!(id.as_str(), "flow-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"flow-1\"");

        assert!(serde_json::from_str::<FlowId>("\"bad id\"").is_err());
    }
}
