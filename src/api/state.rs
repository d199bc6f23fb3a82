//! Application state for shared services

use std::sync::Arc;

use crate::domain::PrincipalResolver;
use crate::infrastructure::services::{
    FlowService, FlowVersionService, MentionService, StepOutputService, StepRunService,
};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub flows: Arc<FlowService>,
    pub versions: Arc<FlowVersionService>,
    pub outputs: Arc<StepOutputService>,
    pub runs: Arc<StepRunService>,
    pub mentions: Arc<MentionService>,
    pub principals: Arc<dyn PrincipalResolver>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
