//! Pure traversal and copy operations over a step tree

use std::collections::{BTreeSet, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::entity::{BranchStep, LoopStep, SplitBranch, SplitStep, Step, StepKind};
use super::error::TreeError;
use super::id::{IdGenerator, StepId};

/// Matches `{{connections['name']}}` references inside step settings
static CONNECTION_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{\{\s*connections\[\s*['"]([^'"]+)['"]\s*\]"#).unwrap());

/// A step paired with its position in the depth-first order of its tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepWithIndex<'a> {
    pub step: &'a Step,
    pub dfs_index: usize,
}

/// Every step reachable from `root`, depth-first, root first.
pub fn all_steps(root: &Step) -> Vec<&Step> {
    let mut steps = Vec::new();
    collect_steps(root, &mut steps);
    steps
}

fn collect_steps<'a>(step: &'a Step, out: &mut Vec<&'a Step>) {
    out.push(step);
    for child in step.children() {
        collect_steps(child, out);
    }
}

pub fn all_step_ids(root: &Step) -> Vec<StepId> {
    all_steps(root).into_iter().map(|s| s.id().clone()).collect()
}

pub fn find_step<'a>(root: &'a Step, name: &str) -> Option<&'a Step> {
    all_steps(root).into_iter().find(|s| s.name() == name)
}

pub(super) fn find_step_mut<'a>(step: &'a mut Step, name: &str) -> Option<&'a mut Step> {
    if step.name == name {
        return Some(step);
    }

    for child in step.children_mut() {
        if let Some(found) = find_step_mut(child, name) {
            return Some(found);
        }
    }

    None
}

/// Steps from the root down to (and including) `target_name`.
///
/// Each entry carries its index in [`all_steps`] order. Empty when the root
/// is absent or no step has the target name.
pub fn find_path_to_step<'a>(root: Option<&'a Step>, target_name: &str) -> Vec<StepWithIndex<'a>> {
    let Some(root) = root else {
        return Vec::new();
    };

    let mut path = Vec::new();
    if !search_path(root, target_name, &mut path) {
        return Vec::new();
    }

    let dfs_order: HashMap<&str, usize> = all_steps(root)
        .into_iter()
        .enumerate()
        .map(|(index, step)| (step.name(), index))
        .collect();

    path.into_iter()
        .map(|step| StepWithIndex {
            step,
            dfs_index: dfs_order.get(step.name()).copied().unwrap_or_default(),
        })
        .collect()
}

fn search_path<'a>(step: &'a Step, target_name: &str, path: &mut Vec<&'a Step>) -> bool {
    path.push(step);

    if step.name() == target_name {
        return true;
    }

    for child in step.children() {
        if search_path(child, target_name, path) {
            return true;
        }
    }

    path.pop();
    false
}

/// Deep copy of `step` where every step gets a fresh id. Names, settings
/// and shape are preserved.
pub fn regenerate_ids(step: &Step, ids: &dyn IdGenerator) -> Step {
    let copy_child = |child: &Option<Box<Step>>| {
        child
            .as_deref()
            .map(|s| Box::new(regenerate_ids(s, ids)))
    };

    let kind = match &step.kind {
        StepKind::Trigger(trigger) => StepKind::Trigger(trigger.clone()),
        StepKind::Single(single) => StepKind::Single(single.clone()),
        StepKind::Branch(branch) => StepKind::Branch(BranchStep {
            on_success_action: copy_child(&branch.on_success_action),
            on_failure_action: copy_child(&branch.on_failure_action),
        }),
        StepKind::Loop(body) => StepKind::Loop(LoopStep {
            first_loop_action: copy_child(&body.first_loop_action),
        }),
        StepKind::Split(split) => StepKind::Split(SplitStep {
            branches: split
                .branches
                .iter()
                .map(|branch| SplitBranch {
                    id: branch.id.clone(),
                    condition_label: branch.condition_label.clone(),
                    next_action: copy_child(&branch.next_action),
                })
                .collect(),
        }),
    };

    Step {
        id: StepId::new(ids.new_id()),
        name: step.name.clone(),
        display_name: step.display_name.clone(),
        valid: step.valid,
        settings: step.settings.clone(),
        kind,
        next_action: copy_child(&step.next_action),
    }
}

/// Rejects duplicate names anywhere in the tree
pub fn validate_unique_names(root: &Step) -> Result<(), TreeError> {
    let mut seen = HashSet::new();

    for step in all_steps(root) {
        if !seen.insert(step.name()) {
            return Err(TreeError::DuplicateStepName(step.name().to_string()));
        }
    }

    Ok(())
}

/// Rejects two steps sharing an id; recorded output is keyed by step id
pub fn validate_unique_ids(root: &Step) -> Result<(), TreeError> {
    let mut seen = HashSet::new();

    for step in all_steps(root) {
        if !seen.insert(step.id()) {
            return Err(TreeError::DuplicateStepId(step.id().to_string()));
        }
    }

    Ok(())
}

/// Full shape check for a flow root: trigger at the root only, unique names and ids
pub fn validate_tree(root: &Step) -> Result<(), TreeError> {
    if !root.is_trigger() {
        return Err(TreeError::RootNotTrigger(root.name().to_string()));
    }

    if let Some(nested) = all_steps(root).into_iter().skip(1).find(|s| s.is_trigger()) {
        return Err(TreeError::MisplacedTrigger(nested.name().to_string()));
    }

    validate_unique_names(root)?;
    validate_unique_ids(root)
}

/// Names of the external connections referenced by any step setting
pub fn referenced_connections(root: &Step) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for step in all_steps(root) {
        for value in step.settings.properties.values() {
            collect_connection_refs(value, &mut names);
        }
    }

    names
}

fn collect_connection_refs(value: &Value, names: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => {
            for capture in CONNECTION_REF.captures_iter(s) {
                names.insert(capture[1].to_string());
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_connection_refs(v, names)),
        Value::Object(map) => map.values().for_each(|v| collect_connection_refs(v, names)),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
