//! Principal resolution from configured bearer tokens

use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::TokenConfig;
use crate::domain::{DomainError, Principal, PrincipalResolver, ProjectId};

/// Resolves tokens listed in `auth.tokens`
#[derive(Debug, Default, Clone)]
pub struct StaticTokenResolver {
    principals: HashMap<String, Principal>,
}

impl StaticTokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.principals.insert(token.into(), principal);
        self
    }

    /// Fails on a token entry whose project id is malformed
    pub fn from_config(tokens: &[TokenConfig]) -> Result<Self, DomainError> {
        tokens.iter().try_fold(Self::new(), |resolver, entry| {
            let project_id = ProjectId::new(entry.project_id.as_str()).map_err(|e| {
                DomainError::validation(format!("Invalid project id for token of '{}': {}", entry.user_id, e))
            })?;
            Ok(resolver.with_token(entry.token.as_str(), Principal::new(entry.user_id.as_str(), project_id)))
        })
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

#[async_trait]
impl PrincipalResolver for StaticTokenResolver {
    async fn resolve(&self, token: &str) -> Result<Option<Principal>, DomainError> {
        Ok(self.principals.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(token: &str, user: &str, project: &str) -> TokenConfig {
        TokenConfig {
            token: token.to_string(),
            user_id: user.to_string(),
            project_id: project.to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolves_configured_tokens() {
        let resolver = StaticTokenResolver::from_config(&[token("t-1", "alice", "project-1")]).unwrap();

        let principal = resolver.resolve("t-1").await.unwrap().unwrap();
        assert_eq!(principal.user_id, "alice");
        assert_eq!(principal.project_id.as_str(), "project-1");

        assert!(resolver.resolve("unknown").await.unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_project_id() {
        let result = StaticTokenResolver::from_config(&[token("t-1", "alice", "bad project")]);
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
