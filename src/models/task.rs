use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::Loggable;

/// Task lifecycle states. Transitions are governed by `crate::workflow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    New,
    InProgress,
    Blocked,
    Review,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub subdivision_id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub created_by: Uuid,
    /// Executants currently assigned to the task.
    pub assignees: Vec<Uuid>,
    /// Departments the task is filed under; used for department-head scoping
    /// together with the owning contract's region.
    pub departments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_assignee(&self, user_id: Uuid) -> bool {
        self.assignees.contains(&user_id)
    }

    pub fn in_department(&self, department_id: Uuid) -> bool {
        self.departments.contains(&department_id)
    }
}

impl Loggable for Task {
    fn entity_type() -> &'static str {
        "task"
    }
    fn subject_id(&self) -> Uuid {
        self.id
    }
}
