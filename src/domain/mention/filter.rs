//! Text search over mention trees

use std::borrow::Cow;

use super::node::MentionTreeNode;

/// Keeps the nodes whose display name or value contains `query`
/// (case-insensitive), along with the ancestors of any surviving descendant.
///
/// An empty query hands back the input slice itself.
pub fn filter_by<'a>(nodes: &'a [MentionTreeNode], query: &str) -> Cow<'a, [MentionTreeNode]> {
    if query.is_empty() {
        return Cow::Borrowed(nodes);
    }

    Cow::Owned(filter_nodes(nodes, &query.to_lowercase()))
}

fn filter_nodes(nodes: &[MentionTreeNode], query: &str) -> Vec<MentionTreeNode> {
    let mut kept = Vec::new();

    for node in nodes {
        if node.is_test_placeholder() {
            continue;
        }

        if !node.children().is_empty() {
            let children = filter_nodes(node.children(), query);
            if !children.is_empty() {
                kept.push(MentionTreeNode {
                    key: node.key.clone(),
                    data: node.data.clone(),
                    children: Some(children),
                });
                continue;
            }
        }

        if matches_query(node, query) {
            kept.push(MentionTreeNode {
                key: node.key.clone(),
                data: node.data.clone(),
                children: None,
            });
        }
    }

    kept
}

fn matches_query(node: &MentionTreeNode, query: &str) -> bool {
    let value = node
        .data
        .value
        .as_ref()
        .map(|v| v.to_string().to_lowercase())
        .unwrap_or_default();

    node.data.display_name.to_lowercase().contains(query) || value.contains(query)
}
