//! Step executor contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;
use crate::domain::flow_version::FlowVersion;
use crate::domain::step::Step;

#[cfg(test)]
use mockall::automock;

/// Result of running one step in isolation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepRunOutcome {
    pub success: bool,
    pub output: Value,
}

impl StepRunOutcome {
    pub fn success(output: Value) -> Self {
        Self {
            success: true,
            output,
        }
    }

    pub fn failure(output: Value) -> Self {
        Self {
            success: false,
            output,
        }
    }
}

/// Runs a single action of a flow version
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(&self, version: &FlowVersion, step: &Step) -> Result<StepRunOutcome, DomainError>;
}
