//! Mention trees: addressable views of recorded step output

mod builder;
mod filter;
mod format;
mod node;

pub use builder::{
    EMPTY_LIST, MAX_SLICE_LENGTH, build_mention_tree, create_test_node, get_all_steps_mentions,
    has_step_sample_data,
};
pub use filter::filter_by;
pub use format::{escape_key, format_step_output};
pub use node::{MentionNodeData, MentionTreeNode};
