//! Recorded step test output

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::FlowVersionId;
use crate::domain::step::StepId;

/// Output recorded for one step of one flow version
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepTestOutput {
    id: String,
    flow_version_id: FlowVersionId,
    step_id: StepId,
    output: Value,
    last_test_date: DateTime<Utc>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl StepTestOutput {
    pub fn new(
        id: impl Into<String>,
        flow_version_id: FlowVersionId,
        step_id: StepId,
        output: Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            flow_version_id,
            step_id,
            output,
            last_test_date: now,
            created: now,
            updated: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn flow_version_id(&self) -> &FlowVersionId {
        &self.flow_version_id
    }

    pub fn step_id(&self) -> &StepId {
        &self.step_id
    }

    pub fn output(&self) -> &Value {
        &self.output
    }

    pub fn last_test_date(&self) -> DateTime<Utc> {
        self.last_test_date
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Folds a newer recording into this record, keeping its identity
    pub fn overwrite_with(&mut self, newer: StepTestOutput) {
        self.output = newer.output;
        self.last_test_date = newer.last_test_date.max(self.last_test_date);
        self.updated = newer.updated.max(self.updated);
    }

    pub fn to_output_with_data(&self) -> StepOutputWithData {
        StepOutputWithData {
            output: self.output.clone(),
            last_test_date: Some(self.last_test_date),
        }
    }
}

/// Output as seen by the mention builder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepOutputWithData {
    pub output: Value,

    /// Absent when the step still needs a test run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_test_date: Option<DateTime<Utc>>,
}
