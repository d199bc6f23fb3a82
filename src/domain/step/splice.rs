//! Subtree insertion (paste)

use std::collections::HashSet;

use super::entity::{Step, StepKind};
use super::error::TreeError;
use super::location::StepLocationRelativeToParent;
use super::tree::{all_steps, find_step_mut};

/// Inserts `subtree` into the tree rooted at `root`.
///
/// The slot selected by `location` on `parent_name` receives the subtree and
/// its previous occupant is re-attached after the last step of the subtree's
/// `next_action` chain. Without a parent the subtree goes after the last step
/// in depth-first order. `root` is left untouched when an error is returned.
pub fn splice(
    root: &mut Step,
    subtree: Step,
    parent_name: Option<&str>,
    location: StepLocationRelativeToParent,
    branch_id: Option<&str>,
) -> Result<(), TreeError> {
    if subtree.is_trigger() {
        return Err(TreeError::MisplacedTrigger(subtree.name().to_string()));
    }

    check_name_collisions(root, &subtree)?;

    let (parent_name, location) = match parent_name {
        Some(name) => (name.to_string(), location),
        None => {
            let last = all_steps(root)
                .last()
                .map(|s| s.name().to_string())
                .unwrap_or_else(|| root.name().to_string());
            (last, StepLocationRelativeToParent::After)
        }
    };

    let parent = find_step_mut(root, &parent_name)
        .ok_or_else(|| TreeError::ParentNotFound(parent_name.clone()))?;

    let slot = select_slot(parent, location, branch_id)?;

    let mut subtree = subtree;
    let displaced = slot.take();
    append_to_chain(&mut subtree, displaced);
    *slot = Some(Box::new(subtree));

    Ok(())
}

fn check_name_collisions(root: &Step, subtree: &Step) -> Result<(), TreeError> {
    let mut names: HashSet<&str> = all_steps(root).into_iter().map(|s| s.name()).collect();

    for step in all_steps(subtree) {
        if !names.insert(step.name()) {
            return Err(TreeError::DuplicateStepName(step.name().to_string()));
        }
    }

    Ok(())
}

fn select_slot<'a>(
    parent: &'a mut Step,
    location: StepLocationRelativeToParent,
    branch_id: Option<&str>,
) -> Result<&'a mut Option<Box<Step>>, TreeError> {
    use StepLocationRelativeToParent as Loc;

    let incompatible = |parent: &str| TreeError::IncompatibleLocation {
        parent: parent.to_string(),
        location,
    };

    match (location, &mut parent.kind) {
        (Loc::After, _) => Ok(&mut parent.next_action),
        (Loc::InsideSuccessBranch, StepKind::Branch(branch)) => Ok(&mut branch.on_success_action),
        (Loc::InsideFailureBranch, StepKind::Branch(branch)) => Ok(&mut branch.on_failure_action),
        (Loc::InsideLoop, StepKind::Loop(body)) => Ok(&mut body.first_loop_action),
        (Loc::InsideSplit, StepKind::Split(split)) => {
            let branch_id = branch_id.ok_or_else(|| TreeError::MissingBranchId(parent.name.clone()))?;

            match split.branches.iter_mut().find(|b| b.id == branch_id) {
                Some(branch) => Ok(&mut branch.next_action),
                None => Err(TreeError::BranchNotFound {
                    parent: parent.name.clone(),
                    branch_id: branch_id.to_string(),
                }),
            }
        }
        _ => Err(incompatible(&parent.name)),
    }
}

fn append_to_chain(step: &mut Step, tail: Option<Box<Step>>) {
    if tail.is_none() {
        return;
    }

    match step.next_action.as_deref_mut() {
        Some(next) => append_to_chain(next, tail),
        None => step.next_action = tail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::{
        BranchStep, LoopStep, SingleStep, SplitBranch, SplitStep, TriggerStep, all_step_ids,
        find_step,
    };

    fn single(name: &str) -> Step {
        Step::new(format!("id-{}", name), name, name, StepKind::Single(SingleStep::default()))
    }

    fn names(root: &Step) -> Vec<&str> {
        all_steps(root).into_iter().map(|s| s.name()).collect()
    }

    fn trigger() -> Step {
        Step::new("id-trigger", "trigger", "Trigger", StepKind::Trigger(TriggerStep::default()))
    }

    #[test]
    fn test_splice_after_reattaches_previous_next() {
        let mut root = trigger().with_next_action(single("a").with_next_action(single("b")));

        let pasted = single("x").with_next_action(single("y"));
        splice(&mut root, pasted, Some("a"), StepLocationRelativeToParent::After, None).unwrap();

        assert_eq!(names(&root), vec!["trigger", "a", "x", "y", "b"]);
    }

    #[test]
    fn test_splice_without_parent_appends_after_last_step() {
        let mut root = trigger().with_next_action(single("a"));

        splice(&mut root, single("x"), None, StepLocationRelativeToParent::InsideLoop, None).unwrap();

        assert_eq!(names(&root), vec!["trigger", "a", "x"]);
    }

    #[test]
    fn test_splice_into_branch_and_loop() {
        let branch = Step::new(
            "id-branch",
            "branch",
            "Branch",
            StepKind::Branch(BranchStep::new().with_on_success(single("ok"))),
        );
        let looped = Step::new("id-loop", "loop", "Loop", StepKind::Loop(LoopStep::new()));
        let mut root = trigger().with_next_action(branch.with_next_action(looped));

        splice(&mut root, single("first"), Some("branch"), StepLocationRelativeToParent::InsideSuccessBranch, None)
            .unwrap();
        splice(&mut root, single("fail"), Some("branch"), StepLocationRelativeToParent::InsideFailureBranch, None)
            .unwrap();
        splice(&mut root, single("body"), Some("loop"), StepLocationRelativeToParent::InsideLoop, None).unwrap();

        assert_eq!(names(&root), vec!["trigger", "branch", "first", "ok", "fail", "loop", "body"]);
    }

    #[test]
    fn test_splice_into_split_branch() {
        let split = Step::new(
            "id-split",
            "split",
            "Split",
            StepKind::Split(SplitStep::new(vec![
                SplitBranch::new("a", "A"),
                SplitBranch::new("b", "B").with_next_action(single("existing")),
            ])),
        );
        let mut root = trigger().with_next_action(split);

        splice(&mut root, single("x"), Some("split"), StepLocationRelativeToParent::InsideSplit, Some("b")).unwrap();

        let split = find_step(&root, "split").unwrap();
        match split.kind() {
            StepKind::Split(split) => {
                let head = split.branches[1].next_action.as_deref().unwrap();
                assert_eq!(head.name(), "x");
                assert_eq!(head.next_action().map(|s| s.name()), Some("existing"));
                assert!(split.branches[0].next_action.is_none());
            }
            other => panic!("expected split, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_splice_split_requires_known_branch() {
        let split = Step::new(
            "id-split",
            "split",
            "Split",
            StepKind::Split(SplitStep::new(vec![SplitBranch::new("a", "A")])),
        );
        let mut root = trigger().with_next_action(split);
        let before = root.clone();

        let missing = splice(&mut root, single("x"), Some("split"), StepLocationRelativeToParent::InsideSplit, None);
        assert_eq!(missing, Err(TreeError::MissingBranchId("split".to_string())));

        let unknown =
            splice(&mut root, single("x"), Some("split"), StepLocationRelativeToParent::InsideSplit, Some("zz"));
        assert_eq!(
            unknown,
            Err(TreeError::BranchNotFound {
                parent: "split".to_string(),
                branch_id: "zz".to_string()
            })
        );
        assert_eq!(root, before);
    }

    #[test]
    fn test_splice_rejects_incompatible_location() {
        let mut root = trigger().with_next_action(single("a"));
        let before = root.clone();

        let result = splice(&mut root, single("x"), Some("a"), StepLocationRelativeToParent::InsideLoop, None);

        assert_eq!(
            result,
            Err(TreeError::IncompatibleLocation {
                parent: "a".to_string(),
                location: StepLocationRelativeToParent::InsideLoop
            })
        );
        assert_eq!(root, before);
    }

    #[test]
    fn test_splice_rejects_unknown_parent_duplicates_and_triggers() {
        let mut root = trigger().with_next_action(single("a"));
        let before = root.clone();

        assert_eq!(
            splice(&mut root, single("x"), Some("nope"), StepLocationRelativeToParent::After, None),
            Err(TreeError::ParentNotFound("nope".to_string()))
        );
        assert_eq!(
            splice(&mut root, single("a"), Some("trigger"), StepLocationRelativeToParent::After, None),
            Err(TreeError::DuplicateStepName("a".to_string()))
        );
        assert_eq!(
            splice(&mut root, trigger(), None, StepLocationRelativeToParent::After, None),
            Err(TreeError::MisplacedTrigger("trigger".to_string()))
        );
        assert_eq!(root, before);
        assert_eq!(all_step_ids(&root).len(), 2);
    }
}
