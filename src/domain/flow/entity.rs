//! Flow entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::storage::StorageEntity;
use crate::domain::{FlowId, ProjectId};

/// A logical automation owned by a project; its steps live in versions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flow {
    id: FlowId,
    project_id: ProjectId,
    display_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Flow {
    pub fn new(id: FlowId, project_id: ProjectId, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            project_id,
            display_name: display_name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &FlowId {
        &self.id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn belongs_to(&self, project_id: &ProjectId) -> bool {
        &self.project_id == project_id
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Flow {
    type Key = FlowId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
