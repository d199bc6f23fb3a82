//! Domain layer - flow tree model, lifecycle rules and collaborator contracts

pub mod error;
pub mod flow;
pub mod flow_version;
pub mod id;
pub mod mention;
pub mod principal;
pub mod step;
pub mod step_output;
pub mod step_run;
pub mod storage;

pub use error::DomainError;
pub use flow::Flow;
pub use flow_version::{FlowVersion, FlowVersionRepository, FlowVersionState, PastePosition};
pub use id::{FlowId, FlowVersionId, IdValidationError, ProjectId};
pub use mention::{MentionNodeData, MentionTreeNode};
pub use principal::{Principal, PrincipalResolver};
pub use step::{IdGenerator, Step, StepId, StepKind, StepLocationRelativeToParent, TreeError};
pub use step_output::{StepOutputStore, StepOutputWithData, StepTestOutput};
pub use step_run::{StepExecutor, StepRunOutcome};
pub use storage::{Storage, StorageEntity, StorageKey};
