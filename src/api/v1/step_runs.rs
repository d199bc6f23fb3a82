//! Step test-run endpoint

use axum::extract::{Path, State};
use tracing::debug;

use crate::api::middleware::RequirePrincipal;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::StepRunOutcome;

/// POST /v1/flow-versions/{id}/steps/{step_name}/run
pub async fn run_step(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path((id, step_name)): Path<(String, String)>,
) -> Result<Json<StepRunOutcome>, ApiError> {
    debug!(flow_version_id = %id, step_name = %step_name, "Running step");

    let outcome = state.runs.run(&principal, &id, &step_name).await?;
    Ok(Json(outcome))
}
