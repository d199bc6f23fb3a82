//! In-memory step output store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{DomainError, FlowVersionId, StepId, StepOutputStore, StepTestOutput};

type OutputKey = (FlowVersionId, StepId);

/// Keeps the latest output per (version, step)
#[derive(Debug, Default)]
pub struct InMemoryStepOutputStore {
    outputs: Arc<RwLock<HashMap<OutputKey, StepTestOutput>>>,
}

impl InMemoryStepOutputStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StepOutputStore for InMemoryStepOutputStore {
    async fn list(
        &self,
        flow_version_id: &FlowVersionId,
        step_ids: &[StepId],
    ) -> Result<Vec<StepTestOutput>, DomainError> {
        let outputs = self.outputs.read().await;

        Ok(step_ids
            .iter()
            .filter_map(|step_id| outputs.get(&(flow_version_id.clone(), step_id.clone())))
            .cloned()
            .collect())
    }

    async fn save(&self, output: StepTestOutput) -> Result<StepTestOutput, DomainError> {
        let key = (output.flow_version_id().clone(), output.step_id().clone());
        let mut outputs = self.outputs.write().await;

        let saved = match outputs.get_mut(&key) {
            Some(existing) => {
                existing.overwrite_with(output);
                existing.clone()
            }
            None => {
                outputs.insert(key, output.clone());
                output
            }
        };

        Ok(saved)
    }
}
