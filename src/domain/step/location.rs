//! Insertion locations relative to a parent step

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a pasted subtree goes relative to its parent step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepLocationRelativeToParent {
    /// Directly after the parent, in its `next_action` slot
    #[default]
    After,

    /// First step of a branch's success continuation
    InsideSuccessBranch,

    /// First step of a branch's failure continuation
    InsideFailureBranch,

    /// First step of a loop body
    InsideLoop,

    /// First step of one split branch (selected by branch id)
    InsideSplit,
}

impl fmt::Display for StepLocationRelativeToParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::After => "AFTER",
            Self::InsideSuccessBranch => "INSIDE_SUCCESS_BRANCH",
            Self::InsideFailureBranch => "INSIDE_FAILURE_BRANCH",
            Self::InsideLoop => "INSIDE_LOOP",
            Self::InsideSplit => "INSIDE_SPLIT",
        };
        f.write_str(name)
    }
}
