//! Builds mention trees from recorded step output

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::format::{escape_key, format_step_output};
use super::node::{MentionNodeData, MentionTreeNode};
use crate::domain::step::{Step, StepId, StepWithIndex};
use crate::domain::step_output::StepOutputWithData;

/// Arrays longer than this are grouped into slice nodes
pub const MAX_SLICE_LENGTH: usize = 100;

/// Value shown for an array or object without entries
pub const EMPTY_LIST: &str = "Empty List";

/// Turns an output value into a mention tree rooted at `property_path`
pub fn build_mention_tree(output: &Value, property_path: &str, display_name: &str) -> MentionTreeNode {
    match output {
        Value::Array(items) => array_node(items, property_path, display_name),
        Value::Object(fields) => object_node(fields, property_path, display_name),
        scalar => MentionTreeNode::leaf(
            property_path,
            MentionNodeData {
                property_path: property_path.to_string(),
                display_name: display_name.to_string(),
                value: Some(Value::String(format_step_output(scalar))),
                ..Default::default()
            },
        ),
    }
}

fn container_data(property_path: &str, display_name: &str, is_empty: bool) -> MentionNodeData {
    MentionNodeData {
        property_path: property_path.to_string(),
        display_name: display_name.to_string(),
        value: is_empty.then(|| Value::String(EMPTY_LIST.to_string())),
        ..Default::default()
    }
}

fn array_node(items: &[Value], property_path: &str, display_name: &str) -> MentionTreeNode {
    let node = MentionTreeNode::leaf(display_name, container_data(property_path, display_name, items.is_empty()));

    if items.is_empty() {
        return node;
    }

    if items.len() <= MAX_SLICE_LENGTH {
        return node.with_children(element_nodes(items, 0, property_path, display_name));
    }

    let slices = items
        .chunks(MAX_SLICE_LENGTH)
        .enumerate()
        .map(|(slice_index, chunk)| {
            let start = slice_index * MAX_SLICE_LENGTH;
            let end = start + chunk.len() - 1;
            let slice_name = format!("{} {}-{}", display_name, start, end);

            MentionTreeNode::leaf(
                slice_name.clone(),
                MentionNodeData {
                    property_path: property_path.to_string(),
                    display_name: slice_name,
                    is_slice: true,
                    ..Default::default()
                },
            )
            .with_children(element_nodes(chunk, start, property_path, display_name))
        })
        .collect();

    node.with_children(slices)
}

/// Element nodes labelled with their global index (`offset` + position)
fn element_nodes(items: &[Value], offset: usize, property_path: &str, display_name: &str) -> Vec<MentionTreeNode> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let index = offset + position;
            build_mention_tree(
                item,
                &format!("{}[{}]", property_path, index),
                &format!("{} [{}]", display_name, index + 1),
            )
        })
        .collect()
}

fn object_node(fields: &Map<String, Value>, property_path: &str, display_name: &str) -> MentionTreeNode {
    let node = MentionTreeNode::leaf(property_path, container_data(property_path, display_name, fields.is_empty()));

    if fields.is_empty() {
        return node;
    }

    let children = fields
        .iter()
        .map(|(key, value)| {
            let child_path = format!("{}['{}']", property_path, escape_key(key));
            build_mention_tree(value, &child_path, key)
        })
        .collect();

    node.with_children(children)
}

/// True when the step carries non-empty sample data
pub fn has_step_sample_data(step: &Step) -> bool {
    match step.settings().sample_data() {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(_) => true,
    }
}

/// Node for a step without recorded output: its sample data when present,
/// otherwise a placeholder asking for a test run
pub fn create_test_node(step: &Step, display_name: &str) -> MentionTreeNode {
    if let Some(sample) = step.settings().sample_data().filter(|_| has_step_sample_data(step)) {
        return build_mention_tree(sample, step.name(), display_name);
    }

    let placeholder = MentionTreeNode::leaf(
        format!("test_{}", step.name()),
        MentionNodeData {
            property_path: step.name().to_string(),
            display_name: display_name.to_string(),
            is_test_step_node: true,
            ..Default::default()
        },
    );

    MentionTreeNode::leaf(
        step.name(),
        MentionNodeData {
            property_path: step.name().to_string(),
            display_name: display_name.to_string(),
            ..Default::default()
        },
    )
    .with_children(vec![placeholder])
}

/// One mention tree per step on `path`, labelled `"<n>. <display name>"`.
///
/// Empty when no step on the version has recorded output yet.
pub fn get_all_steps_mentions(
    path: &[StepWithIndex<'_>],
    outputs: &HashMap<StepId, StepOutputWithData>,
) -> Vec<MentionTreeNode> {
    if outputs.is_empty() {
        return Vec::new();
    }

    path.iter()
        .map(|entry| {
            let display_name = format!("{}. {}", entry.dfs_index + 1, entry.step.display_name());

            match outputs.get(entry.step.id()) {
                Some(recorded) if recorded.last_test_date.is_some() => {
                    build_mention_tree(&recorded.output, entry.step.name(), &display_name)
                }
                _ => create_test_node(entry.step, &display_name),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::{SingleStep, StepKind, StepSettings, TriggerStep, find_path_to_step};
    use chrono::Utc;
    use serde_json::json;

    fn paths(nodes: &[MentionTreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.data.property_path.as_str()).collect()
    }

    #[test]
    fn test_object_with_array() {
        let tree = build_mention_tree(&json!({"a": [1, 2, 3]}), "myStep", "1. My Step");

        assert_eq!(tree.data.property_path, "myStep");
        assert_eq!(tree.data.display_name, "1. My Step");
        assert!(tree.data.value.is_none());

        let children = tree.children();
        assert_eq!(paths(children), vec!["myStep['a']"]);

        let elements = children[0].children();
        assert_eq!(paths(elements), vec!["myStep['a'][0]", "myStep['a'][1]", "myStep['a'][2]"]);
        assert_eq!(elements[1].data.display_name, "a [2]");
        assert_eq!(elements[2].data.value, Some(json!("3")));
        assert!(elements[2].children.is_none());
    }

    #[test]
    fn test_scalar_leaf() {
        let leaf = build_mention_tree(&json!("hi"), "step_1", "1. Step");
        assert_eq!(leaf.key, "step_1");
        assert_eq!(leaf.data.value, Some(json!("\"hi\"")));
        assert!(leaf.children.is_none());

        let null_leaf = build_mention_tree(&Value::Null, "step_1", "1. Step");
        assert_eq!(null_leaf.data.value, Some(json!("null")));
    }

    #[test]
    fn test_empty_containers() {
        for empty in [json!([]), json!({})] {
            let node = build_mention_tree(&empty, "s", "S");
            assert_eq!(node.data.value, Some(json!(EMPTY_LIST)));
            assert!(node.children.is_none());
        }
    }

    #[test]
    fn test_array_of_exactly_max_has_no_slices() {
        let items: Vec<Value> = (0..100).map(|i| json!(i)).collect();
        let node = build_mention_tree(&Value::Array(items), "s", "S");

        let children = node.children();
        assert_eq!(children.len(), 100);
        assert!(children.iter().all(|c| !c.data.is_slice));
        assert_eq!(children[99].data.display_name, "S [100]");
    }

    #[test]
    fn test_large_array_is_sliced() {
        let items: Vec<Value> = (0..250).map(|i| json!(i)).collect();
        let node = build_mention_tree(&Value::Array(items), "s", "S");

        let slices = node.children();
        assert_eq!(slices.len(), 3);
        assert!(node.data.value.is_none());

        let names: Vec<&str> = slices.iter().map(|s| s.data.display_name.as_str()).collect();
        assert_eq!(names, vec!["S 0-99", "S 100-199", "S 200-249"]);
        assert!(slices.iter().all(|s| s.data.is_slice && s.data.property_path == "s"));

        let sizes: Vec<usize> = slices.iter().map(|s| s.children().len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);

        let first_of_second = &slices[1].children()[0];
        assert_eq!(first_of_second.data.property_path, "s[100]");
        assert_eq!(first_of_second.data.display_name, "S [101]");

        let last = slices[2].children().last().unwrap();
        assert_eq!(last.data.property_path, "s[249]");
        assert_eq!(last.data.display_name, "S [250]");
    }

    #[test]
    fn test_object_keys_are_escaped_in_order() {
        let tree = build_mention_tree(&json!({"z": 1, "it's": 2, "a": 3}), "s", "S");
        assert_eq!(paths(tree.children()), vec!["s['z']", "s['it\\'s']", "s['a']"]);
        assert_eq!(tree.children()[1].data.display_name, "it's");
    }

    #[test]
    fn test_build_is_deterministic() {
        let output = json!({"rows": [{"id": 1}, {"id": 2}], "count": 2});
        assert_eq!(build_mention_tree(&output, "s", "S"), build_mention_tree(&output, "s", "S"));
    }

    fn flow() -> Step {
        let second = Step::new("id-2", "step_2", "Notify", StepKind::Single(SingleStep::default()))
            .with_settings(StepSettings::new().with_sample_data(json!({"sent": true})));
        let first = Step::new("id-1", "step_1", "Fetch", StepKind::Single(SingleStep::default()))
            .with_next_action(second.with_next_action(Step::new(
                "id-3",
                "step_3",
                "Archive",
                StepKind::Single(SingleStep::default()),
            )));
        Step::new("id-t", "trigger", "Webhook", StepKind::Trigger(TriggerStep::default())).with_next_action(first)
    }

    #[test]
    fn test_all_steps_mentions() {
        let root = flow();
        let path = find_path_to_step(Some(&root), "step_3");

        let mut outputs = HashMap::new();
        outputs.insert(
            StepId::new("id-1"),
            StepOutputWithData {
                output: json!({"total": 5}),
                last_test_date: Some(Utc::now()),
            },
        );
        outputs.insert(
            StepId::new("id-t"),
            StepOutputWithData {
                output: json!({"body": {}}),
                last_test_date: None,
            },
        );

        let mentions = get_all_steps_mentions(&path, &outputs);
        assert_eq!(mentions.len(), 4);

        let names: Vec<&str> = mentions.iter().map(|m| m.data.display_name.as_str()).collect();
        assert_eq!(names, vec!["1. Webhook", "2. Fetch", "3. Notify", "4. Archive"]);

        // no last_test_date and no sample data
        assert!(mentions[0].is_test_placeholder());
        assert_eq!(mentions[0].children()[0].key, "test_trigger");

        assert_eq!(paths(mentions[1].children()), vec!["step_1['total']"]);

        // falls back to sample data
        assert_eq!(paths(mentions[2].children()), vec!["step_2['sent']"]);

        assert!(mentions[3].is_test_placeholder());
    }

    #[test]
    fn test_all_steps_mentions_without_outputs() {
        let root = flow();
        let path = find_path_to_step(Some(&root), "step_2");
        assert!(get_all_steps_mentions(&path, &HashMap::new()).is_empty());
    }

    #[test]
    fn test_has_step_sample_data() {
        let step = |sample: Option<Value>| {
            let settings = match sample {
                Some(value) => StepSettings::new().with_sample_data(value),
                None => StepSettings::new(),
            };
            Step::new("id", "s", "S", StepKind::Single(SingleStep::default())).with_settings(settings)
        };

        assert!(!has_step_sample_data(&step(None)));
        assert!(!has_step_sample_data(&step(Some(Value::Null))));
        assert!(!has_step_sample_data(&step(Some(json!({})))));
        assert!(!has_step_sample_data(&step(Some(json!([])))));
        assert!(has_step_sample_data(&step(Some(json!(0)))));
        assert!(has_step_sample_data(&step(Some(json!({"k": 1})))));
    }
}
