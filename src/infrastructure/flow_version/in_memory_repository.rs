//! In-memory flow version repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{DomainError, FlowId, FlowVersion, FlowVersionId, FlowVersionRepository};

/// In-memory implementation of FlowVersionRepository
///
/// `compare_and_swap` holds the write lock across the timestamp check and
/// the write.
#[derive(Debug, Default)]
pub struct InMemoryFlowVersionRepository {
    versions: Arc<RwLock<HashMap<String, FlowVersion>>>,
}

impl InMemoryFlowVersionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(versions: Vec<FlowVersion>) -> Self {
        let map = versions
            .into_iter()
            .map(|v| (v.id().as_str().to_string(), v))
            .collect();

        Self {
            versions: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl FlowVersionRepository for InMemoryFlowVersionRepository {
    async fn get(&self, id: &FlowVersionId) -> Result<Option<FlowVersion>, DomainError> {
        let versions = self.versions.read().await;
        Ok(versions.get(id.as_str()).cloned())
    }

    async fn list_by_flow(&self, flow_id: &FlowId) -> Result<Vec<FlowVersion>, DomainError> {
        let versions = self.versions.read().await;
        let mut matching: Vec<FlowVersion> = versions
            .values()
            .filter(|v| v.flow_id() == flow_id)
            .cloned()
            .collect();

        matching.sort_by(|a, b| a.created().cmp(&b.created()).then_with(|| a.id().cmp(b.id())));
        Ok(matching)
    }

    async fn create(&self, version: FlowVersion) -> Result<FlowVersion, DomainError> {
        let mut versions = self.versions.write().await;

        if versions.contains_key(version.id().as_str()) {
            return Err(DomainError::conflict(format!(
                "Flow version '{}' already exists",
                version.id()
            )));
        }

        versions.insert(version.id().as_str().to_string(), version.clone());
        Ok(version)
    }

    async fn compare_and_swap(
        &self,
        version: FlowVersion,
        expected_updated: DateTime<Utc>,
    ) -> Result<FlowVersion, DomainError> {
        let mut versions = self.versions.write().await;

        let stored = versions.get(version.id().as_str()).ok_or_else(|| {
            DomainError::not_found(format!("Flow version '{}' not found", version.id()))
        })?;

        if stored.updated() != expected_updated {
            return Err(DomainError::stale_update(version.id().as_str()));
        }

        versions.insert(version.id().as_str().to_string(), version.clone());
        Ok(version)
    }
}
