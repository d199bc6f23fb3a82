//! Data-selector mention endpoint

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::debug;

use crate::api::middleware::RequirePrincipal;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::MentionTreeNode;

#[derive(Debug, Clone, Deserialize)]
pub struct MentionsQuery {
    pub step_name: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /v1/flow-versions/{id}/mentions?step_name=...&query=...
pub async fn get_step_mentions(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<String>,
    Query(params): Query<MentionsQuery>,
) -> Result<Json<Vec<MentionTreeNode>>, ApiError> {
    let step_name = params
        .step_name
        .ok_or_else(|| ApiError::bad_request("step_name is required").with_param("step_name"))?;

    debug!(flow_version_id = %id, step_name = %step_name, query = ?params.query, "Getting step mentions");

    let mentions = state
        .mentions
        .step_mentions(&principal, &id, &step_name, params.query.as_deref())
        .await?;
    Ok(Json(mentions))
}
