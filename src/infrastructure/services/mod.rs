//! Application services

mod flow_service;
mod flow_version_service;
mod mention_service;
mod step_output_service;
mod step_run_service;

pub use flow_service::{CreateFlowRequest, CreatedFlow, FlowService};
pub use flow_version_service::{
    FlowVersionService, MinimalFlow, PasteActionsRequest, PasteResult, UpdateTriggerRequest,
};
pub use mention_service::MentionService;
pub use step_output_service::StepOutputService;
pub use step_run_service::StepRunService;
