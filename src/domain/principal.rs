//! Authenticated caller and its authorization scope

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::flow::Flow;
use super::{DomainError, ProjectId};

#[cfg(test)]
use mockall::automock;

/// The user behind a request and the project it acts in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub project_id: ProjectId,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, project_id: ProjectId) -> Self {
        Self {
            user_id: user_id.into(),
            project_id,
        }
    }

    /// Fails with `Forbidden` unless `flow` lives in this principal's project
    pub fn assert_owns(&self, flow: &Flow) -> Result<(), DomainError> {
        if flow.belongs_to(&self.project_id) {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "Flow '{}' is not part of project '{}'",
                flow.id(),
                self.project_id
            )))
        }
    }
}

/// Resolves a bearer token to a principal
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// `None` when the token is unknown
    async fn resolve(&self, token: &str) -> Result<Option<Principal>, DomainError>;
}
