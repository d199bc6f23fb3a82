//! Executor that replays recorded sample data

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{DomainError, FlowVersion, Step, StepExecutor, StepRunOutcome};

/// Stand-in for the block runtime: a step "returns" its configured
/// `sample_data`, and a step without sample data fails
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleDataExecutor;

impl SampleDataExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StepExecutor for SampleDataExecutor {
    async fn execute(&self, version: &FlowVersion, step: &Step) -> Result<StepRunOutcome, DomainError> {
        debug!(
            flow_version_id = %version.id(),
            step_name = %step.name(),
            step_type = step.kind().type_name(),
            "Replaying sample data"
        );

        match step.settings().sample_data() {
            Some(sample) if !sample.is_null() => Ok(StepRunOutcome::success(sample.clone())),
            _ => Ok(StepRunOutcome::failure(json!({
                "message": format!("Step '{}' has no sample data to replay", step.name()),
            }))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::{SingleStep, StepKind, StepSettings};
    use crate::domain::{FlowId, FlowVersionId};

    fn version() -> FlowVersion {
        FlowVersion::new(
            FlowVersionId::new("v1").unwrap(),
            FlowId::new("flow-1").unwrap(),
            "Flow",
            Step::empty_trigger("t1"),
        )
    }

    #[tokio::test]
    async fn test_replays_sample_data() {
        let step = Step::new("s1", "step_1", "Step", StepKind::Single(SingleStep::default()))
            .with_settings(StepSettings::new().with_sample_data(json!({"ok": true})));

        let outcome = SampleDataExecutor::new().execute(&version(), &step).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.output, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_fails_without_sample_data() {
        let step = Step::new("s1", "step_1", "Step", StepKind::Single(SingleStep::default()));

        let outcome = SampleDataExecutor::new().execute(&version(), &step).await.unwrap();
        assert!(!outcome.success);
        assert!(outcome.output["message"].as_str().unwrap().contains("step_1"));
        assert!(matches!(outcome.output, Value::Object(_)));
    }
}
