//! Flow version endpoints: reads, trigger updates, paste and lifecycle

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequirePrincipal;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{FlowVersion, PastePosition, Step, StepLocationRelativeToParent};
use crate::infrastructure::services::{
    MinimalFlow, PasteActionsRequest, PasteResult, UpdateTriggerRequest,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ListByConnectionQuery {
    pub connection_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinimalFlowListResponse {
    pub data: Vec<MinimalFlow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTriggerBody {
    pub flow_id: String,
    pub trigger: Step,
    #[serde(default)]
    pub valid: bool,
    pub update_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedResponse {
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasteActionsBody {
    pub flow_id: String,
    pub action: Step,
    #[serde(default)]
    pub parent_step_name: Option<String>,
    #[serde(default)]
    pub step_location_relative_to_parent: StepLocationRelativeToParent,
    #[serde(default)]
    pub branch_id: Option<String>,
    pub update_timestamp: DateTime<Utc>,
}

/// GET /v1/flow-versions?connection_name=...
pub async fn list_latest_by_connection(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Query(query): Query<ListByConnectionQuery>,
) -> Result<Json<MinimalFlowListResponse>, ApiError> {
    let connection_name = query
        .connection_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("connection_name is required").with_param("connection_name"))?;

    debug!(connection_name = %connection_name, "Listing latest versions by connection");

    let data = state
        .versions
        .list_latest_by_connection(&principal, &connection_name)
        .await?;
    Ok(Json(MinimalFlowListResponse { data }))
}

/// GET /v1/flow-versions/{id}
pub async fn get_flow_version(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
) -> Result<Json<FlowVersion>, ApiError> {
    debug!(flow_version_id = %id, "Getting flow version");

    Ok(Json(state.versions.get(&principal, &id).await?))
}

/// POST /v1/flow-versions/{id}/trigger
pub async fn update_trigger(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
    Json(body): Json<UpdateTriggerBody>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    debug!(flow_version_id = %id, flow_id = %body.flow_id, "Updating trigger");

    let request = UpdateTriggerRequest {
        flow_id: body.flow_id,
        trigger: body.trigger,
        valid: body.valid,
        update_timestamp: body.update_timestamp,
    };
    let updated = state.versions.update_trigger(&principal, &id, request).await?;

    Ok(Json(UpdatedResponse { updated }))
}

/// POST /v1/flow-versions/{id}/paste
pub async fn paste_actions(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
    Json(body): Json<PasteActionsBody>,
) -> Result<Json<PasteResult>, ApiError> {
    debug!(
        flow_version_id = %id,
        parent_step_name = ?body.parent_step_name,
        location = ?body.step_location_relative_to_parent,
        "Pasting actions"
    );

    let request = PasteActionsRequest {
        flow_id: body.flow_id,
        action: body.action,
        position: PastePosition {
            parent_step_name: body.parent_step_name,
            location: body.step_location_relative_to_parent,
            branch_id: body.branch_id,
        },
        update_timestamp: body.update_timestamp,
    };

    Ok(Json(state.versions.paste_actions(&principal, &id, request).await?))
}

/// POST /v1/flow-versions/{id}/lock
pub async fn lock_flow_version(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
) -> Result<Json<FlowVersion>, ApiError> {
    debug!(flow_version_id = %id, "Locking flow version");

    Ok(Json(state.versions.lock(&principal, &id).await?))
}

/// POST /v1/flow-versions/{id}/draft
pub async fn create_draft(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<FlowVersion>), ApiError> {
    debug!(flow_version_id = %id, "Creating draft from flow version");

    let draft = state.versions.create_draft(&principal, &id).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}
