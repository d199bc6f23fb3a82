//! Step tree model and tree operations

mod entity;
mod error;
mod id;
mod location;
mod splice;
mod tree;

pub use entity::{
    BranchStep, InputUiInfo, LoopStep, SingleStep, SplitBranch, SplitStep, Step, StepKind,
    StepSettings, TriggerStep,
};
pub use error::TreeError;
pub use id::{IdGenerator, SequentialIdGenerator, StepId};
pub use location::StepLocationRelativeToParent;
pub use splice::splice;
pub use tree::{
    StepWithIndex, all_step_ids, all_steps, find_path_to_step, find_step, referenced_connections,
    regenerate_ids, validate_tree, validate_unique_ids, validate_unique_names,
};
