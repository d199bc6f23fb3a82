//! Mention tree node

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Payload of a mention tree node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MentionNodeData {
    /// Expression path into the step output, e.g. `step_1['items'][2]`
    pub property_path: String,

    pub display_name: String,

    /// Rendered leaf value, or `"Empty List"` for an empty container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_slice: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_test_step_node: bool,
}

/// One node of a mention tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentionTreeNode {
    /// Unique among siblings
    pub key: String,

    pub data: MentionNodeData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MentionTreeNode>>,
}

impl MentionTreeNode {
    pub fn leaf(key: impl Into<String>, data: MentionNodeData) -> Self {
        Self {
            key: key.into(),
            data,
            children: None,
        }
    }

    pub fn with_children(mut self, children: Vec<MentionTreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn children(&self) -> &[MentionTreeNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// True when the first child asks for a test run instead of data
    pub fn is_test_placeholder(&self) -> bool {
        self.children()
            .first()
            .is_some_and(|child| child.data.is_test_step_node)
    }
}
