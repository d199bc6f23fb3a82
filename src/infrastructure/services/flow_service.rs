//! Flow service - creating and reading flows

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::storage::Storage;
use crate::domain::{
    DomainError, Flow, FlowId, FlowVersion, FlowVersionId, FlowVersionRepository, IdGenerator,
    Principal, Step,
};

/// Request to create a new flow
#[derive(Debug, Clone)]
pub struct CreateFlowRequest {
    pub display_name: String,
}

impl CreateFlowRequest {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// A freshly created flow together with its first draft
#[derive(Debug, Clone)]
pub struct CreatedFlow {
    pub flow: Flow,
    pub version: FlowVersion,
}

pub struct FlowService {
    flows: Arc<dyn Storage<Flow>>,
    versions: Arc<dyn FlowVersionRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for FlowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowService").finish()
    }
}

impl FlowService {
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

    /// Creates a flow in the caller's project with an empty DRAFT version
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateFlowRequest,
    ) -> Result<CreatedFlow, DomainError> {
        let display_name = request.display_name.trim();
        if display_name.is_empty() {
            return Err(DomainError::validation("Flow display name cannot be empty"));
        }

        let flow_id = FlowId::new(self.ids.new_id())
            .map_err(|e| DomainError::internal(format!("Generated invalid flow id: {}", e)))?;
        let version_id = FlowVersionId::new(self.ids.new_id())
            .map_err(|e| DomainError::internal(format!("Generated invalid version id: {}", e)))?;

        debug!(flow_id = %flow_id, project_id = %principal.project_id, "Creating flow");

        let flow = self
            .flows
            .create(Flow::new(flow_id.clone(), principal.project_id.clone(), display_name))
            .await?;

        let trigger = Step::empty_trigger(self.ids.new_id());
        let version = self
            .versions
            .create(FlowVersion::new(version_id, flow_id, display_name, trigger))
            .await?;

        info!(flow_id = %flow.id(), flow_version_id = %version.id(), "Flow created");
        Ok(CreatedFlow { flow, version })
    }

    /// Gets a flow of the caller's project
    pub async fn get(&self, principal: &Principal, id: &str) -> Result<Flow, DomainError> {
        let flow_id = parse_flow_id(id)?;
        let flow = self
            .flows
            .get(&flow_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Flow '{}' not found", id)))?;

        principal.assert_owns(&flow)?;
        Ok(flow)
    }

    pub async fn list(&self, principal: &Principal) -> Result<Vec<Flow>, DomainError> {
        let mut flows: Vec<Flow> = self
            .flows
            .list()
            .await?
            .into_iter()
            .filter(|f| f.belongs_to(&principal.project_id))
            .collect();

        flows.sort_by_key(|f| f.created_at());
        Ok(flows)
    }

    /// Number of stored flows across all projects; used by readiness probes
    pub async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.flows.list().await?.len())
    }
}

/// A malformed id names no stored flow
fn parse_flow_id(id: &str) -> Result<FlowId, DomainError> {
    FlowId::new(id).map_err(|_| DomainError::not_found(format!("Flow '{}' not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectId;
    use crate::domain::flow_version::mock::MockFlowVersionRepository;
    use crate::domain::step::SequentialIdGenerator;
    use crate::domain::storage::mock::MockStorage;

    fn principal(project: &str) -> Principal {
        Principal::new("user-1", ProjectId::new(project).unwrap())
    }

    fn service(flows: MockStorage<Flow>) -> (FlowService, Arc<MockFlowVersionRepository>) {
        let versions = Arc::new(MockFlowVersionRepository::new());
        let service = FlowService::new(
            Arc::new(flows),
            versions.clone(),
            Arc::new(SequentialIdGenerator::new("id")),
        );
        (service, versions)
    }

    #[tokio::test]
    async fn test_create_flow_with_first_draft() {
        let (service, versions) = service(MockStorage::new());

        let created = service
            .create(&principal("project-1"), CreateFlowRequest::new("  Nightly report "))
            .await
            .unwrap();

        assert_eq!(created.flow.display_name(), "Nightly report");
        assert_eq!(created.flow.project_id().as_str(), "project-1");
        assert_eq!(created.version.flow_id(), created.flow.id());
        assert!(!created.version.is_locked());
        assert!(created.version.trigger().is_trigger());
        assert_eq!(versions.writes(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (service, versions) = service(MockStorage::new());

        let result = service.create(&principal("project-1"), CreateFlowRequest::new("   ")).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(versions.writes(), 0);
    }

    #[tokio::test]
    async fn test_get_is_project_scoped() {
        let flow = Flow::new(FlowId::new("flow-1").unwrap(), ProjectId::new("project-1").unwrap(), "Flow");
        let (service, _) = service(MockStorage::new().with_entity(flow));

        assert!(service.get(&principal("project-1"), "flow-1").await.is_ok());
        assert!(matches!(
            service.get(&principal("project-2"), "flow-1").await,
            Err(DomainError::Forbidden { .. })
        ));
        assert!(matches!(
            service.get(&principal("project-1"), "flow-9").await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.get(&principal("project-1"), "not a valid id").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_only_returns_own_project() {
        let mine = Flow::new(FlowId::new("flow-1").unwrap(), ProjectId::new("project-1").unwrap(), "Mine");
        let theirs = Flow::new(FlowId::new("flow-2").unwrap(), ProjectId::new("project-2").unwrap(), "Theirs");
        let (service, _) = service(MockStorage::new().with_entity(mine).with_entity(theirs));

        let listed = service.list(&principal("project-1")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_name(), "Mine");
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let (service, _) = service(MockStorage::new().with_error("disk on fire"));
        let result = service.create(&principal("project-1"), CreateFlowRequest::new("Flow")).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
