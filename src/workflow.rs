//! Task status state machine.
//!
//! Transition legality is independent of role logic; authorization happens
//! first (`can_edit_task` or being a current assignee), then the requested
//! transition is validated, then the write goes through a compare-and-set
//! so a concurrent transition surfaces as a conflict instead of a lost
//! update.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::authz::{AccessContext, PermissionResolver};
use crate::errors::{AppError, AppResult};
use crate::events::{log_activity_with_old, EventBus};
use crate::models::{Task, TaskStatus};
use crate::repos::Repositories;

/// Forward transitions per state. The blocked escape hatch is handled
/// separately and takes precedence over this table.
fn forward_transitions(current: TaskStatus) -> &'static [TaskStatus] {
    match current {
        TaskStatus::New => &[TaskStatus::InProgress],
        TaskStatus::InProgress => &[TaskStatus::Review],
        TaskStatus::Review => &[TaskStatus::Completed, TaskStatus::InProgress],
        TaskStatus::Blocked => &[TaskStatus::InProgress],
        TaskStatus::Completed => &[],
    }
}

/// Statuses legally reachable from `current`. Completed is terminal; every
/// other state can additionally be blocked.
pub fn next_allowed_statuses(current: TaskStatus) -> BTreeSet<TaskStatus> {
    let mut next: BTreeSet<TaskStatus> = forward_transitions(current).iter().copied().collect();
    if current != TaskStatus::Completed && current != TaskStatus::Blocked {
        next.insert(TaskStatus::Blocked);
    }
    next
}

/// Validate a requested transition.
///
/// Check order matters: a same-status request is "already in that status"
/// (even blocked -> blocked), then the unconditional to-blocked rule, then
/// the per-state table.
pub fn validate_transition(current: TaskStatus, requested: TaskStatus) -> AppResult<()> {
    if requested == current {
        return Err(AppError::AlreadyInStatus(current));
    }
    if requested == TaskStatus::Blocked && current != TaskStatus::Completed {
        return Ok(());
    }
    if forward_transitions(current).contains(&requested) {
        return Ok(());
    }
    Err(AppError::InvalidTransition {
        from: current,
        to: requested,
    })
}

/// Drives authorized task status changes.
#[derive(Clone)]
pub struct TaskWorkflow {
    repos: Repositories,
    permissions: PermissionResolver,
    event_bus: EventBus,
}

impl TaskWorkflow {
    pub fn new(repos: Repositories, event_bus: EventBus) -> Self {
        let permissions = PermissionResolver::new(repos.clone());
        Self {
            repos,
            permissions,
            event_bus,
        }
    }

    pub async fn transition(
        &self,
        actor: &AccessContext,
        task_id: Uuid,
        next: TaskStatus,
    ) -> AppResult<Task> {
        let task = self
            .repos
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("task {task_id} not found")))?;

        // Assignees may progress their own work without general edit rights.
        let allowed = self.permissions.can_edit_task(actor, task_id).await?
            || (actor.active && task.is_assignee(actor.user_id));
        if !allowed {
            return Err(AppError::forbidden("not allowed to change this task's status"));
        }

        validate_transition(task.status, next)?;

        let updated = self
            .repos
            .tasks
            .update_status(task_id, task.status, next)
            .await?;

        tracing::debug!(
            task = %task_id,
            from = %task.status,
            to = %next,
            actor = %actor.user_id,
            "task status transition"
        );
        log_activity_with_old(
            &self.event_bus,
            "transitioned",
            Some(actor.user_id),
            &updated,
            Some(&task),
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_chain() {
        assert!(validate_transition(TaskStatus::New, TaskStatus::InProgress).is_ok());
        assert!(validate_transition(TaskStatus::InProgress, TaskStatus::Review).is_ok());
        assert!(validate_transition(TaskStatus::Review, TaskStatus::Completed).is_ok());
        assert!(validate_transition(TaskStatus::Review, TaskStatus::InProgress).is_ok());
        assert!(validate_transition(TaskStatus::Blocked, TaskStatus::InProgress).is_ok());
    }

    #[test]
    fn any_open_state_can_block() {
        assert!(validate_transition(TaskStatus::New, TaskStatus::Blocked).is_ok());
        assert!(validate_transition(TaskStatus::InProgress, TaskStatus::Blocked).is_ok());
        assert!(validate_transition(TaskStatus::Review, TaskStatus::Blocked).is_ok());
    }

    #[test]
    fn completed_is_terminal() {
        for target in [
            TaskStatus::New,
            TaskStatus::InProgress,
            TaskStatus::Blocked,
            TaskStatus::Review,
        ] {
            let err = validate_transition(TaskStatus::Completed, target).unwrap_err();
            assert!(matches!(
                err,
                AppError::InvalidTransition {
                    from: TaskStatus::Completed,
                    ..
                }
            ));
        }
    }

    #[test]
    fn same_status_is_rejected_distinctly() {
        let err = validate_transition(TaskStatus::Review, TaskStatus::Review).unwrap_err();
        assert!(matches!(err, AppError::AlreadyInStatus(TaskStatus::Review)));

        // blocked -> blocked is "already", not the escape hatch
        let err = validate_transition(TaskStatus::Blocked, TaskStatus::Blocked).unwrap_err();
        assert!(matches!(err, AppError::AlreadyInStatus(TaskStatus::Blocked)));
    }

    #[test]
    fn skipping_ahead_is_invalid() {
        let err = validate_transition(TaskStatus::New, TaskStatus::Completed).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: TaskStatus::New,
                to: TaskStatus::Completed,
            }
        ));
        assert!(validate_transition(TaskStatus::New, TaskStatus::Review).is_err());
        assert!(validate_transition(TaskStatus::Blocked, TaskStatus::Review).is_err());
    }

    #[test]
    fn next_allowed_matches_the_table() {
        use TaskStatus::*;
        assert_eq!(
            next_allowed_statuses(New),
            BTreeSet::from([InProgress, Blocked])
        );
        assert_eq!(
            next_allowed_statuses(InProgress),
            BTreeSet::from([Review, Blocked])
        );
        assert_eq!(
            next_allowed_statuses(Review),
            BTreeSet::from([InProgress, Completed, Blocked])
        );
        assert_eq!(next_allowed_statuses(Blocked), BTreeSet::from([InProgress]));
        assert!(next_allowed_statuses(Completed).is_empty());
    }
}
