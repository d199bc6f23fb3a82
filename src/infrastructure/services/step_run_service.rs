//! Step run service - test-runs a single action and records its output

use std::sync::Arc;

use tracing::{info, warn};

use super::{FlowVersionService, StepOutputService};
use crate::domain::{DomainError, Principal, StepExecutor, StepRunOutcome};

pub struct StepRunService {
    versions: Arc<FlowVersionService>,
    outputs: Arc<StepOutputService>,
    executor: Arc<dyn StepExecutor>,
}

impl std::fmt::Debug for StepRunService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRunService").finish()
    }
}

impl StepRunService {
    pub fn new(
        versions: Arc<FlowVersionService>,
        outputs: Arc<StepOutputService>,
        executor: Arc<dyn StepExecutor>,
    ) -> Self {
        Self {
            versions,
            outputs,
            executor,
        }
    }

    /// Runs `step_name` and saves its output under the step's id.
    ///
    /// Fails with `StepNotFound` when the step is missing or is the trigger.
    pub async fn run(
        &self,
        principal: &Principal,
        flow_version_id: &str,
        step_name: &str,
    ) -> Result<StepRunOutcome, DomainError> {
        let version = self.versions.get(principal, flow_version_id).await?;

        let step = version
            .step(step_name)
            .filter(|s| s.kind().is_action())
            .ok_or_else(|| DomainError::step_not_found(step_name))?;

        let outcome = self.executor.execute(&version, step).await?;
        if !outcome.success {
            warn!(flow_version_id = %version.id(), step_name, "Step run failed");
        }

        self.outputs
            .record(version.id(), step.id().clone(), outcome.output.clone())
            .await?;

        info!(flow_version_id = %version.id(), step_name, success = outcome.success, "Step run finished");
        Ok(outcome)
    }
}
