//! Step tree entity
//!
//! A flow's steps form a tree rooted at a single trigger. Every step owns its
//! `next_action` continuation, and control-flow kinds own additional child
//! subtrees (branch outcomes, loop body, split branches).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::StepId;

/// Last recorded sample data and test timestamp for a step
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InputUiInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_selected_data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_test_date: Option<DateTime<Utc>>,
}

/// Kind-specific step configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StepSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_ui_info: Option<InputUiInfo>,

    /// Free-form configuration (block inputs, conditions, loop items, ...)
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl StepSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_sample_data(mut self, sample_data: Value) -> Self {
        self.input_ui_info.get_or_insert_with(InputUiInfo::default).sample_data = Some(sample_data);
        self
    }

    pub fn with_last_test_date(mut self, date: DateTime<Utc>) -> Self {
        self.input_ui_info.get_or_insert_with(InputUiInfo::default).last_test_date = Some(date);
        self
    }

    pub fn sample_data(&self) -> Option<&Value> {
        self.input_ui_info.as_ref()?.sample_data.as_ref()
    }
}

/// Trigger configuration (root of every flow)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TriggerStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_name: Option<String>,
}

/// Plain action backed by an integration block
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SingleStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
}

/// Two-way conditional branch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BranchStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_success_action: Option<Box<Step>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure_action: Option<Box<Step>>,
}

impl BranchStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_success(mut self, step: Step) -> Self {
        self.on_success_action = Some(Box::new(step));
        self
    }

    pub fn with_on_failure(mut self, step: Step) -> Self {
        self.on_failure_action = Some(Box::new(step));
        self
    }
}

/// Loop whose body runs once per item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoopStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_loop_action: Option<Box<Step>>,
}

impl LoopStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, step: Step) -> Self {
        self.first_loop_action = Some(Box::new(step));
        self
    }
}

/// One labelled continuation of a split step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplitBranch {
    pub id: String,

    pub condition_label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<Box<Step>>,
}

impl SplitBranch {
    pub fn new(id: impl Into<String>, condition_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            condition_label: condition_label.into(),
            next_action: None,
        }
    }

    pub fn with_next_action(mut self, step: Step) -> Self {
        self.next_action = Some(Box::new(step));
        self
    }
}

/// Parallel split into ordered, independent branches
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SplitStep {
    #[serde(default)]
    pub branches: Vec<SplitBranch>,
}

impl SplitStep {
    pub fn new(branches: Vec<SplitBranch>) -> Self {
        Self { branches }
    }
}

/// Closed set of step kinds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepKind {
    Trigger(TriggerStep),
    Single(SingleStep),
    Branch(BranchStep),
    Loop(LoopStep),
    Split(SplitStep),
}

impl StepKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Trigger(_) => "TRIGGER",
            Self::Single(_) => "SINGLE",
            Self::Branch(_) => "BRANCH",
            Self::Loop(_) => "LOOP",
            Self::Split(_) => "SPLIT",
        }
    }

    /// Actions are every kind except the trigger
    pub fn is_action(&self) -> bool {
        !matches!(self, Self::Trigger(_))
    }
}

/// A node of the step tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    pub(super) id: StepId,

    /// Unique within a flow version; expressions reference steps by name
    pub(super) name: String,

    pub(super) display_name: String,

    #[serde(default)]
    pub(super) valid: bool,

    #[serde(default)]
    pub(super) settings: StepSettings,

    #[serde(flatten)]
    pub(super) kind: StepKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) next_action: Option<Box<Step>>,
}

impl Step {
    pub fn new(
        id: impl Into<StepId>,
        name: impl Into<String>,
        display_name: impl Into<String>,
        kind: StepKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_name: display_name.into(),
            valid: true,
            settings: StepSettings::default(),
            kind,
            next_action: None,
        }
    }

    /// Empty trigger used as the root of a freshly authored flow
    pub fn empty_trigger(id: impl Into<StepId>) -> Self {
        Self::new(id, "trigger", "Select Trigger", StepKind::Trigger(TriggerStep::default()))
            .with_valid(false)
    }

    pub fn with_settings(mut self, settings: StepSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn with_next_action(mut self, step: Step) -> Self {
        self.next_action = Some(Box::new(step));
        self
    }

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn settings(&self) -> &StepSettings {
        &self.settings
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    pub fn next_action(&self) -> Option<&Step> {
        self.next_action.as_deref()
    }

    pub fn is_trigger(&self) -> bool {
        matches!(self.kind, StepKind::Trigger(_))
    }

    /// Direct child subtrees in traversal order: kind-specific children
    /// first, then `next_action`.
    pub fn children(&self) -> Vec<&Step> {
        let mut children = Vec::new();

        match &self.kind {
            StepKind::Trigger(_) | StepKind::Single(_) => {}
            StepKind::Branch(branch) => {
                children.extend(branch.on_success_action.as_deref());
                children.extend(branch.on_failure_action.as_deref());
            }
            StepKind::Loop(body) => {
                children.extend(body.first_loop_action.as_deref());
            }
            StepKind::Split(split) => {
                children.extend(split.branches.iter().filter_map(|b| b.next_action.as_deref()));
            }
        }

        children.extend(self.next_action.as_deref());
        children
    }

    pub(super) fn children_mut(&mut self) -> Vec<&mut Step> {
        let mut children = Vec::new();

        match &mut self.kind {
            StepKind::Trigger(_) | StepKind::Single(_) => {}
            StepKind::Branch(branch) => {
                children.extend(branch.on_success_action.as_deref_mut());
                children.extend(branch.on_failure_action.as_deref_mut());
            }
            StepKind::Loop(body) => {
                children.extend(body.first_loop_action.as_deref_mut());
            }
            StepKind::Split(split) => {
                children.extend(
                    split
                        .branches
                        .iter_mut()
                        .filter_map(|b| b.next_action.as_deref_mut()),
                );
            }
        }

        children.extend(self.next_action.as_deref_mut());
        children
    }
}
