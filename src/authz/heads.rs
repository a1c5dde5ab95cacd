use uuid::Uuid;

use super::context::AccessContext;
use crate::errors::{AppError, AppResult};
use crate::events::{log_activity, EventBus};
use crate::models::{levels, DepartmentHeadAssignment, NewDepartmentHead};
use crate::repos::Repositories;

/// Assignment-time management of the department-head capability.
///
/// Appointments are admin-only and logged at critical severity. The
/// one-head-per-(department, region) invariant is enforced by the
/// repository insert, which serializes the check with the write.
#[derive(Clone)]
pub struct DepartmentHeadService {
    repos: Repositories,
    event_bus: EventBus,
}

impl DepartmentHeadService {
    pub fn new(repos: Repositories, event_bus: EventBus) -> Self {
        Self { repos, event_bus }
    }

    pub async fn assign(
        &self,
        actor: &AccessContext,
        req: NewDepartmentHead,
    ) -> AppResult<DepartmentHeadAssignment> {
        if !actor.is_admin() {
            return Err(AppError::forbidden("only admins may appoint department heads"));
        }

        let user = self
            .repos
            .users
            .find_by_id(req.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user {} not found", req.user_id)))?;
        if !user.active {
            return Err(AppError::bad_request("cannot appoint an inactive user"));
        }
        if user.role_level < levels::MANAGER {
            return Err(AppError::bad_request(
                "department heads must hold at least manager level",
            ));
        }

        self.repos
            .departments
            .find_by_id(req.department_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("department {} not found", req.department_id))
            })?;
        self.repos
            .regions
            .find_by_id(req.region_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("region {} not found", req.region_id)))?;

        let assignment = DepartmentHeadAssignment {
            user_id: req.user_id,
            department_id: req.department_id,
            region_id: req.region_id,
            created_at: chrono::Utc::now(),
        };
        let stored = self.repos.heads.insert(assignment).await?;

        log_activity(&self.event_bus, "assigned", Some(actor.user_id), &stored);
        tracing::info!(
            user_id = %stored.user_id,
            department_id = %stored.department_id,
            region_id = %stored.region_id,
            "department head appointed"
        );
        Ok(stored)
    }

    pub async fn revoke(
        &self,
        actor: &AccessContext,
        user_id: Uuid,
        department_id: Uuid,
        region_id: Uuid,
    ) -> AppResult<()> {
        if !actor.is_admin() {
            return Err(AppError::forbidden("only admins may revoke department heads"));
        }

        let existing = self
            .repos
            .heads
            .find_head(department_id, region_id)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| AppError::not_found("no such department head assignment"))?;

        self.repos
            .heads
            .remove(user_id, department_id, region_id)
            .await?;

        log_activity(&self.event_bus, "revoked", Some(actor.user_id), &existing);
        Ok(())
    }

    pub async fn assignments_for(&self, user_id: Uuid) -> AppResult<Vec<DepartmentHeadAssignment>> {
        self.repos.heads.list_by_user(user_id).await
    }
}
