//! Mention service - data-selector trees for a step

use std::sync::Arc;

use tracing::debug;

use super::{FlowVersionService, StepOutputService};
use crate::domain::mention::{filter_by, get_all_steps_mentions};
use crate::domain::step::find_path_to_step;
use crate::domain::{DomainError, MentionTreeNode, Principal, StepId};

pub struct MentionService {
    versions: Arc<FlowVersionService>,
    outputs: Arc<StepOutputService>,
}

impl std::fmt::Debug for MentionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MentionService").finish()
    }
}

impl MentionService {
    pub fn new(versions: Arc<FlowVersionService>, outputs: Arc<StepOutputService>) -> Self {
        Self { versions, outputs }
    }

    /// Mention trees for every step from the trigger down to `step_name`,
    /// narrowed by `query` when one is given
    pub async fn step_mentions(
        &self,
        principal: &Principal,
        flow_version_id: &str,
        step_name: &str,
        query: Option<&str>,
    ) -> Result<Vec<MentionTreeNode>, DomainError> {
        let version = self.versions.get(principal, flow_version_id).await?;

        let path = find_path_to_step(Some(version.trigger()), step_name);
        if path.is_empty() {
            return Err(DomainError::step_not_found(step_name));
        }

        let step_ids: Vec<StepId> = path.iter().map(|entry| entry.step.id().clone()).collect();
        let outputs = self.outputs.outputs_for(version.id(), &step_ids).await?;

        let mentions = get_all_steps_mentions(&path, &outputs);
        let filtered = filter_by(&mentions, query.unwrap_or_default()).into_owned();

        debug!(
            flow_version_id = %version.id(),
            step_name,
            path_len = path.len(),
            nodes = filtered.len(),
            "Built step mentions"
        );
        Ok(filtered)
    }
}
