//! Flow version service - reads, trigger updates, paste and lifecycle
//!
//! Every mutation runs the same short-circuiting check chain (existence,
//! flow match, project scope, lock state, freshness) before touching the
//! version, then commits through the repository's compare-and-swap so two
//! writers holding the same timestamp cannot both succeed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::step::referenced_connections;
use crate::domain::storage::Storage;
use crate::domain::{
    DomainError, Flow, FlowId, FlowVersion, FlowVersionId, FlowVersionRepository, IdGenerator,
    PastePosition, Principal, Step,
};

/// Replace a version's step tree
#[derive(Debug, Clone)]
pub struct UpdateTriggerRequest {
    pub flow_id: String,
    pub trigger: Step,
    pub valid: bool,
    /// `updated` value the caller last saw
    pub update_timestamp: DateTime<Utc>,
}

/// Paste a copied subtree into a version
#[derive(Debug, Clone)]
pub struct PasteActionsRequest {
    pub flow_id: String,
    pub action: Step,
    pub position: PastePosition,
    pub update_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PasteResult {
    pub updated: DateTime<Utc>,
    pub pasted: usize,
}

/// Latest version of a flow, as listed by connection lookups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimalFlow {
    pub id: FlowId,
    pub display_name: String,
    pub version_id: FlowVersionId,
    pub version_display_name: String,
    pub updated: DateTime<Utc>,
}

pub struct FlowVersionService {
    flows: Arc<dyn Storage<Flow>>,
    versions: Arc<dyn FlowVersionRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for FlowVersionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowVersionService").finish()
    }
}

impl FlowVersionService {
    pub fn new(
        flows: Arc<dyn Storage<Flow>>,
        versions: Arc<dyn FlowVersionRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            flows,
            versions,
            ids,
        }
    }

    /// Gets a version whose flow belongs to the caller's project
    pub async fn get(&self, principal: &Principal, id: &str) -> Result<FlowVersion, DomainError> {
        let version = self.find(id).await?;

        let flow = self
            .flows
            .get(version.flow_id())
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Flow '{}' not found", version.flow_id())))?;
        principal.assert_owns(&flow)?;

        Ok(version)
    }

    /// Replaces the step tree and returns the new `updated` timestamp
    pub async fn update_trigger(
        &self,
        principal: &Principal,
        id: &str,
        request: UpdateTriggerRequest,
    ) -> Result<DateTime<Utc>, DomainError> {
        let mut version = self
            .load_for_mutation(principal, id, &request.flow_id, request.update_timestamp)
            .await?;
        let seen = version.updated();

        version.replace_trigger(request.trigger, request.valid, principal.user_id.as_str())?;
        let saved = self.commit(version, seen).await?;

        info!(
            flow_version_id = %saved.id(),
            updated_by = %principal.user_id,
            steps = saved.step_count(),
            "Flow version trigger updated"
        );
        Ok(saved.updated())
    }

    /// Pastes a fresh-id copy of `request.action` into the version
    pub async fn paste_actions(
        &self,
        principal: &Principal,
        id: &str,
        request: PasteActionsRequest,
    ) -> Result<PasteResult, DomainError> {
        let mut version = self
            .load_for_mutation(principal, id, &request.flow_id, request.update_timestamp)
            .await?;
        let seen = version.updated();

        let pasted = version.paste(
            &request.action,
            &request.position,
            self.ids.as_ref(),
            principal.user_id.as_str(),
        )?;
        let saved = self.commit(version, seen).await?;

        info!(flow_version_id = %saved.id(), pasted, "Actions pasted");
        Ok(PasteResult {
            updated: saved.updated(),
            pasted,
        })
    }

    /// DRAFT -> LOCKED
    pub async fn lock(&self, principal: &Principal, id: &str) -> Result<FlowVersion, DomainError> {
        let mut version = self.get(principal, id).await?;
        let seen = version.updated();

        if let Err(e) = version.lock() {
            warn!(flow_version_id = %id, error = %e, "Lock rejected");
            return Err(e);
        }

        let saved = self.commit(version, seen).await?;
        info!(flow_version_id = %saved.id(), "Flow version locked");
        Ok(saved)
    }

    /// New DRAFT of the same flow, starting from a copy of `id`'s steps
    pub async fn create_draft(&self, principal: &Principal, id: &str) -> Result<FlowVersion, DomainError> {
        let source = self.get(principal, id).await?;

        let draft_id = FlowVersionId::new(self.ids.new_id())
            .map_err(|e| DomainError::internal(format!("Generated invalid version id: {}", e)))?;
        let draft = self.versions.create(source.draft_copy(draft_id)).await?;

        info!(flow_version_id = %draft.id(), source = %source.id(), "Draft created");
        Ok(draft)
    }

    /// Latest version of every project flow that references `connection_name`
    pub async fn list_latest_by_connection(
        &self,
        principal: &Principal,
        connection_name: &str,
    ) -> Result<Vec<MinimalFlow>, DomainError> {
        let mut found = Vec::new();

        for flow in self.flows.list().await? {
            if !flow.belongs_to(&principal.project_id) {
                continue;
            }

            let latest = self
                .versions
                .list_by_flow(flow.id())
                .await?
                .into_iter()
                .max_by_key(|v| v.created());

            let Some(latest) = latest else {
                continue;
            };

            if referenced_connections(latest.trigger()).contains(connection_name) {
                found.push(MinimalFlow {
                    id: flow.id().clone(),
                    display_name: flow.display_name().to_string(),
                    version_id: latest.id().clone(),
                    version_display_name: latest.display_name().to_string(),
                    updated: latest.updated(),
                });
            }
        }

        found.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(connection_name, count = found.len(), "Listed flows by connection");
        Ok(found)
    }

    async fn find(&self, id: &str) -> Result<FlowVersion, DomainError> {
        let version_id = parse_version_id(id)?;

        self.versions
            .get(&version_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Flow version '{}' not found", id)))
    }

    /// Runs the mutation checks in order, stopping at the first failure
    async fn load_for_mutation(
        &self,
        principal: &Principal,
        id: &str,
        flow_id: &str,
        update_timestamp: DateTime<Utc>,
    ) -> Result<FlowVersion, DomainError> {
        let version = self.find(id).await?;

        if version.flow_id().as_str() != flow_id {
            return Err(self.reject(
                id,
                DomainError::invalid_request("It is not possible to update the flowId of a flow version"),
            ));
        }

        let flow = self.flows.get(version.flow_id()).await?;
        if !flow.is_some_and(|f| f.belongs_to(&principal.project_id)) {
            return Err(self.reject(
                id,
                DomainError::invalid_request("The flow and version are not associated with the project"),
            ));
        }

        if version.is_locked() {
            return Err(self.reject(id, DomainError::locked_version(id)));
        }

        if version.updated() > update_timestamp {
            return Err(self.reject(id, DomainError::stale_update(id)));
        }

        Ok(version)
    }

    async fn commit(&self, version: FlowVersion, seen: DateTime<Utc>) -> Result<FlowVersion, DomainError> {
        let id = version.id().to_string();
        self.versions
            .compare_and_swap(version, seen)
            .await
            .map_err(|e| self.reject(&id, e))
    }

    fn reject(&self, id: &str, error: DomainError) -> DomainError {
        warn!(flow_version_id = %id, error = %error, "Flow version mutation rejected");
        error
    }
}

/// A malformed id names no stored version
fn parse_version_id(id: &str) -> Result<FlowVersionId, DomainError> {
    FlowVersionId::new(id).map_err(|_| DomainError::not_found(format!("Flow version '{}' not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow_version::mock::MockFlowVersionRepository;
    use crate::domain::step::{SequentialIdGenerator, SingleStep, StepKind, StepSettings, TriggerStep};
    use crate::domain::storage::mock::MockStorage;
    use crate::domain::{ProjectId, StepLocationRelativeToParent};
    use chrono::Duration;
    use serde_json::json;

    fn principal(project: &str) -> Principal {
        Principal::new("user-1", ProjectId::new(project).unwrap())
    }

    fn flow(id: &str, project: &str) -> Flow {
        Flow::new(FlowId::new(id).unwrap(), ProjectId::new(project).unwrap(), format!("Flow {}", id))
    }

    fn single(name: &str) -> Step {
        Step::new(format!("id-{}", name), name, name, StepKind::Single(SingleStep::default()))
    }

    fn trigger() -> Step {
        Step::new("id-trigger", "trigger", "Webhook", StepKind::Trigger(TriggerStep::default()))
    }

    fn version(id: &str, flow: &str) -> FlowVersion {
        FlowVersion::new(
            FlowVersionId::new(id).unwrap(),
            FlowId::new(flow).unwrap(),
            "Draft",
            trigger().with_next_action(single("step_1")),
        )
    }

    struct Fixture {
        service: FlowVersionService,
        versions: Arc<MockFlowVersionRepository>,
    }

    fn fixture(flows: Vec<Flow>, versions: Vec<FlowVersion>) -> Fixture {
        let storage = flows.into_iter().fold(MockStorage::new(), |s, f| s.with_entity(f));
        let repo = versions
            .into_iter()
            .fold(MockFlowVersionRepository::new(), |r, v| r.with_version(v));
        let repo = Arc::new(repo);

        Fixture {
            service: FlowVersionService::new(
                Arc::new(storage),
                repo.clone(),
                Arc::new(SequentialIdGenerator::new("gen")),
            ),
            versions: repo,
        }
    }

    fn update(flow_id: &str, at: DateTime<Utc>) -> UpdateTriggerRequest {
        UpdateTriggerRequest {
            flow_id: flow_id.to_string(),
            trigger: trigger().with_next_action(single("step_1").with_next_action(single("step_2"))),
            valid: true,
            update_timestamp: at,
        }
    }

    #[tokio::test]
    async fn test_update_trigger_then_stale_second_writer() {
        let v1 = version("v1", "flow-1");
        let t0 = v1.updated();
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);
        let caller = principal("project-1");

        let t1 = fx.service.update_trigger(&caller, "v1", update("flow-1", t0)).await.unwrap();
        assert!(t1 > t0);

        let second = fx.service.update_trigger(&caller, "v1", update("flow-1", t0)).await;
        assert_eq!(second, Err(DomainError::stale_update("v1")));

        let stored = fx.service.get(&caller, "v1").await.unwrap();
        assert_eq!(stored.updated(), t1);
        assert!(stored.is_valid());
        assert_eq!(stored.updated_by(), Some("user-1"));
        assert_eq!(fx.versions.writes(), 1);
    }

    #[tokio::test]
    async fn test_update_trigger_newer_timestamp_is_accepted() {
        let v1 = version("v1", "flow-1");
        let later = v1.updated() + Duration::seconds(30);
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);

        let result = fx.service.update_trigger(&principal("project-1"), "v1", update("flow-1", later)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_trigger_not_found() {
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![]);
        let result = fx.service.update_trigger(&principal("project-1"), "v1", update("flow-1", Utc::now())).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_trigger_flow_mismatch() {
        let v1 = version("v1", "flow-1");
        let t0 = v1.updated();
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);

        let result = fx.service.update_trigger(&principal("project-1"), "v1", update("flow-2", t0)).await;
        assert_eq!(
            result,
            Err(DomainError::invalid_request("It is not possible to update the flowId of a flow version"))
        );
        assert_eq!(fx.versions.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_trigger_wrong_project() {
        let v1 = version("v1", "flow-1");
        let t0 = v1.updated();
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);

        let result = fx.service.update_trigger(&principal("project-2"), "v1", update("flow-1", t0)).await;
        assert_eq!(
            result,
            Err(DomainError::invalid_request("The flow and version are not associated with the project"))
        );
    }

    #[tokio::test]
    async fn test_update_trigger_locked_short_circuits_before_staleness() {
        let mut v1 = version("v1", "flow-1");
        v1.lock().unwrap();
        let locked_at = v1.updated();
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);

        // stale timestamp too, but the lock check comes first
        let stale = locked_at - Duration::seconds(60);
        let result = fx.service.update_trigger(&principal("project-1"), "v1", update("flow-1", stale)).await;
        assert_eq!(result, Err(DomainError::locked_version("v1")));

        let stored = fx.service.get(&principal("project-1"), "v1").await.unwrap();
        assert_eq!(stored.updated(), locked_at);
    }

    #[tokio::test]
    async fn test_update_trigger_rejects_duplicate_names() {
        let v1 = version("v1", "flow-1");
        let t0 = v1.updated();
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);

        let mut request = update("flow-1", t0);
        request.trigger = trigger().with_next_action(single("dup").with_next_action(single("dup")));

        let result = fx.service.update_trigger(&principal("project-1"), "v1", request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(fx.versions.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_trigger_rejects_duplicate_step_ids() {
        let v1 = version("v1", "flow-1");
        let t0 = v1.updated();
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);

        let mut request = update("flow-1", t0);
        request.trigger = trigger().with_next_action(
            Step::new("same", "step_1", "Fetch", StepKind::Single(SingleStep::default())).with_next_action(
                Step::new("same", "step_2", "Notify", StepKind::Single(SingleStep::default())),
            ),
        );

        let result = fx.service.update_trigger(&principal("project-1"), "v1", request).await;
        assert_eq!(result, Err(DomainError::validation("Duplicate step id: 'same'")));
        assert_eq!(fx.versions.writes(), 0);

        let stored = fx.service.get(&principal("project-1"), "v1").await.unwrap();
        assert!(stored.step("step_2").is_none());
        assert_eq!(stored.updated(), t0);
    }

    #[tokio::test]
    async fn test_update_trigger_surfaces_storage_failure() {
        let repo = MockFlowVersionRepository::new()
            .with_version(version("v1", "flow-1"))
            .with_error("connection reset");
        let service = FlowVersionService::new(
            Arc::new(MockStorage::new().with_entity(flow("flow-1", "project-1"))),
            Arc::new(repo),
            Arc::new(SequentialIdGenerator::new("gen")),
        );

        let result = service
            .update_trigger(&principal("project-1"), "v1", update("flow-1", Utc::now()))
            .await;
        assert_eq!(result, Err(DomainError::storage("connection reset")));

        let read = service.get(&principal("project-1"), "v1").await;
        assert!(matches!(read, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_malformed_version_id_is_not_found() {
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![version("v1", "flow-1")]);

        let read = fx.service.get(&principal("project-1"), "v.1").await;
        assert_eq!(read, Err(DomainError::not_found("Flow version 'v.1' not found")));

        let write = fx
            .service
            .update_trigger(&principal("project-1"), "v.1", update("flow-1", Utc::now()))
            .await;
        assert!(matches!(write, Err(DomainError::NotFound { .. })));
        assert_eq!(fx.versions.writes(), 0);
    }

    #[tokio::test]
    async fn test_paste_actions() {
        let v1 = version("v1", "flow-1");
        let t0 = v1.updated();
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);

        let request = PasteActionsRequest {
            flow_id: "flow-1".to_string(),
            action: single("copied").with_next_action(single("copied_2")),
            position: PastePosition {
                parent_step_name: Some("trigger".to_string()),
                location: StepLocationRelativeToParent::After,
                branch_id: None,
            },
            update_timestamp: t0,
        };

        let result = fx.service.paste_actions(&principal("project-1"), "v1", request).await.unwrap();
        assert_eq!(result.pasted, 2);
        assert!(result.updated > t0);

        let stored = fx.service.get(&principal("project-1"), "v1").await.unwrap();
        let names: Vec<&str> = crate::domain::step::all_steps(stored.trigger())
            .into_iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, vec!["trigger", "copied", "copied_2", "step_1"]);
        assert_eq!(stored.step("copied").map(|s| s.id().as_str()), Some("gen-1"));
    }

    #[tokio::test]
    async fn test_paste_actions_stale() {
        let v1 = version("v1", "flow-1");
        let stale = v1.updated() - Duration::seconds(1);
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![v1]);

        let request = PasteActionsRequest {
            flow_id: "flow-1".to_string(),
            action: single("copied"),
            position: PastePosition::default(),
            update_timestamp: stale,
        };

        let result = fx.service.paste_actions(&principal("project-1"), "v1", request).await;
        assert_eq!(result, Err(DomainError::stale_update("v1")));
    }

    #[tokio::test]
    async fn test_lock_and_create_draft() {
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![version("v1", "flow-1")]);
        let caller = principal("project-1");

        let locked = fx.service.lock(&caller, "v1").await.unwrap();
        assert!(locked.is_locked());
        assert_eq!(fx.service.lock(&caller, "v1").await, Err(DomainError::locked_version("v1")));

        let draft = fx.service.create_draft(&caller, "v1").await.unwrap();
        assert!(!draft.is_locked());
        assert_eq!(draft.id().as_str(), "gen-1");
        assert_eq!(draft.trigger(), locked.trigger());
    }

    #[tokio::test]
    async fn test_get_forbidden_for_other_project() {
        let fx = fixture(vec![flow("flow-1", "project-1")], vec![version("v1", "flow-1")]);
        let result = fx.service.get(&principal("project-2"), "v1").await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_list_latest_by_connection() {
        let uses_slack = |id: &str, flow: &str| {
            FlowVersion::new(
                FlowVersionId::new(id).unwrap(),
                FlowId::new(flow).unwrap(),
                format!("Version {}", id),
                trigger().with_next_action(single("notify").with_settings(
                    StepSettings::new().with_property("auth", json!("{{connections['slack']}}")),
                )),
            )
        };

        let fx = fixture(
            vec![flow("flow-1", "project-1"), flow("flow-2", "project-1"), flow("flow-3", "project-2")],
            vec![uses_slack("v1", "flow-1"), version("v2", "flow-2"), uses_slack("v3", "flow-3")],
        );

        let found = fx.service.list_latest_by_connection(&principal("project-1"), "slack").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "flow-1");
        assert_eq!(found[0].version_id.as_str(), "v1");

        let none = fx.service.list_latest_by_connection(&principal("project-1"), "github").await.unwrap();
        assert!(none.is_empty());
    }
}
