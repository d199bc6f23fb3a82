//! Flow version repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entity::FlowVersion;
use crate::domain::{DomainError, FlowId, FlowVersionId};

/// Persistence for flow versions
#[async_trait]
pub trait FlowVersionRepository: Send + Sync + std::fmt::Debug {
    async fn get(&self, id: &FlowVersionId) -> Result<Option<FlowVersion>, DomainError>;

    /// All versions of one flow, oldest first
    async fn list_by_flow(&self, flow_id: &FlowId) -> Result<Vec<FlowVersion>, DomainError>;

    async fn create(&self, version: FlowVersion) -> Result<FlowVersion, DomainError>;

    /// Stores `version` only if the stored copy still has `expected_updated`.
    ///
    /// The comparison and the write happen as one atomic step. Fails with
    /// `StaleUpdate` when another writer got there first and `NotFound` when
    /// the version is gone.
    async fn compare_and_swap(
        &self,
        version: FlowVersion,
        expected_updated: DateTime<Utc>,
    ) -> Result<FlowVersion, DomainError>;
}
