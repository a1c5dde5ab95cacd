use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::{Loggable, Severity};

/// Independent catalog entity. Scoping is always a (department, region)
/// pair, never a department alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user acting as head of one department within one region. At most one
/// head may exist per (department_id, region_id) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentHeadAssignment {
    pub user_id: Uuid,
    pub department_id: Uuid,
    pub region_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Loggable for DepartmentHeadAssignment {
    fn entity_type() -> &'static str {
        "department_head"
    }
    fn subject_id(&self) -> Uuid {
        self.user_id
    }
    fn severity(&self) -> Severity {
        Severity::Critical
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartmentHead {
    pub user_id: Uuid,
    pub department_id: Uuid,
    pub region_id: Uuid,
}
