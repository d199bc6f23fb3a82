//! Step output store contract

use async_trait::async_trait;

use super::entity::StepTestOutput;
use crate::domain::step::StepId;
use crate::domain::{DomainError, FlowVersionId};

#[cfg(test)]
use mockall::automock;

/// Persists recorded step test output, one record per (version, step)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StepOutputStore: Send + Sync {
    /// Records for the given steps; steps without output are omitted
    async fn list(
        &self,
        flow_version_id: &FlowVersionId,
        step_ids: &[StepId],
    ) -> Result<Vec<StepTestOutput>, DomainError>;

    /// Inserts, or overwrites the existing record for the same step
    async fn save(&self, output: StepTestOutput) -> Result<StepTestOutput, DomainError>;
}
