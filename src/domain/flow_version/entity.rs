//! Flow version entity and its lifecycle

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::step::{
    IdGenerator, Step, StepLocationRelativeToParent, all_steps, find_step, regenerate_ids, splice,
    validate_tree,
};
use crate::domain::{DomainError, FlowId, FlowVersionId};

/// Lifecycle state; `Locked` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowVersionState {
    #[default]
    Draft,
    Locked,
}

impl fmt::Display for FlowVersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("DRAFT"),
            Self::Locked => f.write_str("LOCKED"),
        }
    }
}

/// Where and how a copied subtree is pasted
#[derive(Debug, Clone, Default)]
pub struct PastePosition {
    pub parent_step_name: Option<String>,
    pub location: StepLocationRelativeToParent,
    pub branch_id: Option<String>,
}

/// One versioned snapshot of a flow's step tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowVersion {
    id: FlowVersionId,
    flow_id: FlowId,
    display_name: String,
    trigger: Step,
    state: FlowVersionState,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_by: Option<String>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl FlowVersion {
    /// Creates a DRAFT version owning `trigger`
    pub fn new(
        id: FlowVersionId,
        flow_id: FlowId,
        display_name: impl Into<String>,
        trigger: Step,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            flow_id,
            display_name: display_name.into(),
            valid: trigger.is_valid(),
            trigger,
            state: FlowVersionState::Draft,
            updated_by: None,
            created: now,
            updated: now,
        }
    }

    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.updated = updated;
        self
    }

    pub fn id(&self) -> &FlowVersionId {
        &self.id
    }

    pub fn flow_id(&self) -> &FlowId {
        &self.flow_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn trigger(&self) -> &Step {
        &self.trigger
    }

    pub fn state(&self) -> FlowVersionState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == FlowVersionState::Locked
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    /// Looks a step up by name
    pub fn step(&self, name: &str) -> Option<&Step> {
        find_step(&self.trigger, name)
    }

    pub fn step_count(&self) -> usize {
        all_steps(&self.trigger).len()
    }

    /// DRAFT -> LOCKED
    pub fn lock(&mut self) -> Result<(), DomainError> {
        self.ensure_draft()?;
        self.state = FlowVersionState::Locked;
        self.touch();
        Ok(())
    }

    /// Replaces the whole step tree after checking its shape
    pub fn replace_trigger(
        &mut self,
        trigger: Step,
        valid: bool,
        actor: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_draft()?;
        validate_tree(&trigger)?;

        self.trigger = trigger;
        self.valid = valid;
        self.updated_by = Some(actor.into());
        self.touch();
        Ok(())
    }

    /// Pastes a fresh-id copy of `action` and returns the number of steps added.
    ///
    /// The version is unchanged when the paste fails.
    pub fn paste(
        &mut self,
        action: &Step,
        position: &PastePosition,
        ids: &dyn IdGenerator,
        actor: impl Into<String>,
    ) -> Result<usize, DomainError> {
        self.ensure_draft()?;

        let copy = regenerate_ids(action, ids);
        let pasted = all_steps(&copy).len();

        let mut trigger = self.trigger.clone();
        splice(
            &mut trigger,
            copy,
            position.parent_step_name.as_deref(),
            position.location,
            position.branch_id.as_deref(),
        )?;
        validate_tree(&trigger)?;

        self.trigger = trigger;
        self.updated_by = Some(actor.into());
        self.touch();
        Ok(pasted)
    }

    /// New DRAFT of the same flow carrying a copy of this version's steps
    pub fn draft_copy(&self, id: FlowVersionId) -> FlowVersion {
        let mut draft = FlowVersion::new(id, self.flow_id.clone(), self.display_name.clone(), self.trigger.clone());
        draft.valid = self.valid;
        draft
    }

    fn ensure_draft(&self) -> Result<(), DomainError> {
        if self.is_locked() {
            return Err(DomainError::locked_version(self.id.as_str()));
        }
        Ok(())
    }

    /// Advances `updated`, keeping it strictly increasing
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated = if now > self.updated {
            now
        } else {
            self.updated + Duration::microseconds(1)
        };
    }
}
