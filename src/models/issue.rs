use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::Loggable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    Answered,
    Closed,
    Archived,
}

impl IssueStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::Answered => "answered",
            IssueStatus::Closed => "closed",
            IssueStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    /// None marks a global issue, visible to admins only.
    pub region_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub subject: String,
    pub status: IssueStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    pub fn is_global(&self) -> bool {
        self.region_id.is_none()
    }
}

impl Loggable for Issue {
    fn entity_type() -> &'static str {
        "issue"
    }
    fn subject_id(&self) -> Uuid {
        self.id
    }
}
