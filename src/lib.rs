//! Flowdesk
//!
//! Authoring backend for workflow automations:
//! - Step trees rooted at a trigger, with branch, loop and split steps
//! - Flow versions with optimistic concurrency and locking
//! - Recorded step test output and data-selector mention trees

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{Flow, IdGenerator};
use infrastructure::{
    auth::StaticTokenResolver,
    flow_version::InMemoryFlowVersionRepository,
    id::UuidGenerator,
    services::{FlowService, FlowVersionService, MentionService, StepOutputService, StepRunService},
    step_output::InMemoryStepOutputStore,
    step_run::SampleDataExecutor,
    storage::InMemoryStorage,
};
use tracing::{info, warn};

/// Create the application state from default configuration
pub fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default())
}

/// Create the application state with in-memory stores
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let flows = Arc::new(InMemoryStorage::<Flow>::new());
    let versions = Arc::new(InMemoryFlowVersionRepository::new());
    let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);

    let principals = StaticTokenResolver::from_config(&config.auth.tokens)?;
    if principals.is_empty() {
        warn!("No API tokens configured; every /v1 request will be rejected");
    }

    let flow_service = Arc::new(FlowService::new(flows.clone(), versions.clone(), ids.clone()));
    let version_service = Arc::new(FlowVersionService::new(flows, versions, ids.clone()));
    let output_service = Arc::new(StepOutputService::new(
        version_service.clone(),
        Arc::new(InMemoryStepOutputStore::new()),
        ids,
    ));
    let run_service = Arc::new(StepRunService::new(
        version_service.clone(),
        output_service.clone(),
        Arc::new(SampleDataExecutor::new()),
    ));
    let mention_service = Arc::new(MentionService::new(version_service.clone(), output_service.clone()));

    info!(tokens = principals.len(), "Application state initialized");

    Ok(AppState {
        flows: flow_service,
        versions: version_service,
        outputs: output_service,
        runs: run_service,
        mentions: mention_service,
        principals: Arc::new(principals),
    })
}
