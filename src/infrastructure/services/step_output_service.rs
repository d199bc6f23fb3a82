//! Step output service - recorded test output per step

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::FlowVersionService;
use crate::domain::{
    DomainError, FlowVersionId, IdGenerator, Principal, StepId, StepOutputStore,
    StepOutputWithData, StepTestOutput,
};

pub struct StepOutputService {
    versions: Arc<FlowVersionService>,
    store: Arc<dyn StepOutputStore>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for StepOutputService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepOutputService").finish()
    }
}

impl StepOutputService {
    pub fn new(
        versions: Arc<FlowVersionService>,
        store: Arc<dyn StepOutputStore>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            versions,
            store,
            ids,
        }
    }

    /// Recorded output for `step_ids` of a version in the caller's project
    pub async fn get_test_output(
        &self,
        principal: &Principal,
        flow_version_id: &str,
        step_ids: &[StepId],
    ) -> Result<HashMap<StepId, StepOutputWithData>, DomainError> {
        let version = self.versions.get(principal, flow_version_id).await?;
        self.outputs_for(version.id(), step_ids).await
    }

    /// Records output for one step; fails with `NotFound` for an unknown version
    pub async fn save_test_output(
        &self,
        principal: &Principal,
        flow_version_id: &str,
        step_id: StepId,
        output: Value,
    ) -> Result<StepTestOutput, DomainError> {
        let version = self.versions.get(principal, flow_version_id).await?;
        self.record(version.id(), step_id, output).await
    }

    pub(crate) async fn outputs_for(
        &self,
        flow_version_id: &FlowVersionId,
        step_ids: &[StepId],
    ) -> Result<HashMap<StepId, StepOutputWithData>, DomainError> {
        if step_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let outputs: HashMap<StepId, StepOutputWithData> = self
            .store
            .list(flow_version_id, step_ids)
            .await?
            .into_iter()
            .map(|o| (o.step_id().clone(), o.to_output_with_data()))
            .collect();

        debug!(flow_version_id = %flow_version_id, requested = step_ids.len(), found = outputs.len(), "Loaded step outputs");
        Ok(outputs)
    }

    pub(crate) async fn record(
        &self,
        flow_version_id: &FlowVersionId,
        step_id: StepId,
        output: Value,
    ) -> Result<StepTestOutput, DomainError> {
        let record = StepTestOutput::new(self.ids.new_id(), flow_version_id.clone(), step_id, output);
        let saved = self.store.save(record).await?;

        info!(flow_version_id = %flow_version_id, step_id = %saved.step_id(), "Step output saved");
        Ok(saved)
    }
}
