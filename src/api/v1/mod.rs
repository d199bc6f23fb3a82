//! v1 API endpoints

pub mod flow_versions;
pub mod flows;
pub mod mentions;
pub mod step_runs;
pub mod test_output;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/flows", get(flows::list_flows).post(flows::create_flow))
        .route("/flows/{flow_id}", get(flows::get_flow))
        .route("/flow-versions", get(flow_versions::list_latest_by_connection))
        .route("/flow-versions/{id}", get(flow_versions::get_flow_version))
        .route("/flow-versions/{id}/trigger", post(flow_versions::update_trigger))
        .route("/flow-versions/{id}/paste", post(flow_versions::paste_actions))
        .route("/flow-versions/{id}/lock", post(flow_versions::lock_flow_version))
        .route("/flow-versions/{id}/draft", post(flow_versions::create_draft))
        .route(
            "/flow-versions/{id}/test-output",
            get(test_output::get_test_output).post(test_output::save_test_output),
        )
        .route("/flow-versions/{id}/mentions", get(mentions::get_step_mentions))
        .route(
            "/flow-versions/{id}/steps/{step_name}/run",
            post(step_runs::run_step),
        )
}
