//! Step test output endpoints

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::api::middleware::RequirePrincipal;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{StepId, StepOutputWithData, StepTestOutput};

#[derive(Debug, Clone, Deserialize)]
pub struct TestOutputQuery {
    /// Comma-separated step ids
    pub step_ids: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveTestOutputBody {
    pub step_id: StepId,
    #[serde(default)]
    pub output: Value,
}

/// GET /v1/flow-versions/{id}/test-output?step_ids=a,b
pub async fn get_test_output(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
    Query(query): Query<TestOutputQuery>,
) -> Result<Json<BTreeMap<StepId, StepOutputWithData>>, ApiError> {
    let step_ids = parse_step_ids(query.step_ids.as_deref())?;
    debug!(flow_version_id = %id, step_ids = step_ids.len(), "Getting test output");

    let outputs = state.outputs.get_test_output(&principal, &id, &step_ids).await?;
    Ok(Json(outputs.into_iter().collect()))
}

/// POST /v1/flow-versions/{id}/test-output
pub async fn save_test_output(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
    Json(body): Json<SaveTestOutputBody>,
) -> Result<Json<StepTestOutput>, ApiError> {
    debug!(flow_version_id = %id, step_id = %body.step_id, "Saving test output");

    let saved = state
        .outputs
        .save_test_output(&principal, &id, body.step_id, body.output)
        .await?;
    Ok(Json(saved))
}

fn parse_step_ids(raw: Option<&str>) -> Result<Vec<StepId>, ApiError> {
    let ids: Vec<StepId> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(StepId::new)
        .collect();

    if ids.is_empty() {
        return Err(ApiError::bad_request("step_ids is required").with_param("step_ids"));
    }
    Ok(ids)
}
