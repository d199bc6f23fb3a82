//! Flow endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequirePrincipal;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{Flow, FlowVersion};
use crate::infrastructure::services::CreateFlowRequest;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFlowBody {
    pub display_name: String,
}

/// A new flow and its first draft version
#[derive(Debug, Clone, Serialize)]
pub struct CreateFlowResponse {
    pub flow: Flow,
    pub version: FlowVersion,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowListResponse {
    pub data: Vec<Flow>,
}

/// POST /v1/flows
pub async fn create_flow(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Json(body): Json<CreateFlowBody>,
) -> Result<(StatusCode, Json<CreateFlowResponse>), ApiError> {
    debug!(project_id = %principal.project_id, "Creating flow");

    let created = state
        .flows
        .create(&principal, CreateFlowRequest::new(body.display_name))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateFlowResponse {
            flow: created.flow,
            version: created.version,
        }),
    ))
}

/// GET /v1/flows
pub async fn list_flows(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<Json<FlowListResponse>, ApiError> {
    debug!(project_id = %principal.project_id, "Listing flows");

    let data = state.flows.list(&principal).await?;
    Ok(Json(FlowListResponse { data }))
}

/// GET /v1/flows/{flow_id}
pub async fn get_flow(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(flow_id): Path<String>,
) -> Result<Json<Flow>, ApiError> {
    debug!(flow_id = %flow_id, "Getting flow");

    let flow = state.flows.get(&principal, &flow_id).await?;
    Ok(Json(flow))
}
