use uuid::Uuid;

use super::context::AccessContext;
use super::scope::{Action, EntityKind};
use super::AuthzMode;
use crate::errors::{AppError, AppResult};
use crate::models::{levels, Contract, Subdivision, Task};
use crate::repos::Repositories;

/// Per-entity-type, per-action authorization checks.
///
/// Every check is a pure read-then-decide over (context, target snapshot).
/// An unresolvable user or target yields `Ok(false)`: absence of evidence
/// is denial, not an error. Only a dangling internal reference (a task
/// pointing at a missing subdivision) surfaces as `Integrity`, since
/// treating it as "no access" would mask a data bug.
#[derive(Clone)]
pub struct PermissionResolver {
    repos: Repositories,
}

impl PermissionResolver {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Form-access check: no target region/parent is known yet, so the
    /// answer is "could this user create one anywhere".
    pub fn can_access_create_form(&self, ctx: &AccessContext, kind: EntityKind) -> bool {
        if !ctx.active {
            return false;
        }
        if ctx.role_level >= levels::ADMIN {
            return true;
        }
        if ctx.role_level >= levels::DIRECTOR {
            return ctx.region_id.is_some();
        }
        match kind {
            EntityKind::Subdivision | EntityKind::Task => {
                ctx.role_level >= levels::MANAGER || ctx.overlay().is_some()
            }
            _ => false,
        }
    }

    /// Save-time check against the concrete target region.
    pub async fn can_create_contract(&self, ctx: &AccessContext, region_id: Uuid) -> AppResult<bool> {
        if !ctx.active {
            return Ok(false);
        }
        if ctx.role_level >= levels::ADMIN {
            return Ok(true);
        }
        if ctx.role_level >= levels::DIRECTOR {
            return Ok(ctx.region_id == Some(region_id));
        }
        Ok(false)
    }

    pub async fn can_create_subdivision(
        &self,
        ctx: &AccessContext,
        contract_id: Uuid,
    ) -> AppResult<bool> {
        let Some(contract) = self.repos.contracts.find_by_id(contract_id).await? else {
            return Ok(false);
        };
        Ok(self.allowed_on_contract(ctx, &contract))
    }

    pub async fn can_create_task(
        &self,
        ctx: &AccessContext,
        subdivision_id: Uuid,
    ) -> AppResult<bool> {
        let Some(subdivision) = self.repos.subdivisions.find_by_id(subdivision_id).await? else {
            return Ok(false);
        };
        let contract = self.contract_of_subdivision(&subdivision).await?;
        Ok(self.allowed_on_contract(ctx, &contract))
    }

    /// Global issues (no region) are admin territory end to end.
    pub async fn can_create_issue(
        &self,
        ctx: &AccessContext,
        region_id: Option<Uuid>,
    ) -> AppResult<bool> {
        if !ctx.active {
            return Ok(false);
        }
        if ctx.role_level >= levels::ADMIN {
            return Ok(true);
        }
        match region_id {
            Some(region) if ctx.role_level >= levels::DIRECTOR => {
                Ok(ctx.region_id == Some(region))
            }
            _ => Ok(false),
        }
    }

    pub async fn can_edit_contract(&self, ctx: &AccessContext, contract_id: Uuid) -> AppResult<bool> {
        let Some(contract) = self.repos.contracts.find_by_id(contract_id).await? else {
            return Ok(false);
        };
        if !ctx.active {
            return Ok(false);
        }
        if ctx.role_level >= levels::ADMIN {
            return Ok(true);
        }
        if ctx.role_level >= levels::DIRECTOR {
            return Ok(ctx.region_id == Some(contract.region_id));
        }
        Ok(false)
    }

    pub async fn can_delete_contract(
        &self,
        ctx: &AccessContext,
        contract_id: Uuid,
    ) -> AppResult<bool> {
        self.can_edit_contract(ctx, contract_id).await
    }

    pub async fn can_edit_subdivision(
        &self,
        ctx: &AccessContext,
        subdivision_id: Uuid,
    ) -> AppResult<bool> {
        let Some(subdivision) = self.repos.subdivisions.find_by_id(subdivision_id).await? else {
            return Ok(false);
        };
        let contract = self.contract_of_subdivision(&subdivision).await?;
        Ok(self.allowed_on_contract(ctx, &contract))
    }

    pub async fn can_delete_subdivision(
        &self,
        ctx: &AccessContext,
        subdivision_id: Uuid,
    ) -> AppResult<bool> {
        self.can_edit_subdivision(ctx, subdivision_id).await
    }

    pub async fn can_view_task(&self, ctx: &AccessContext, task_id: Uuid) -> AppResult<bool> {
        let Some(task) = self.repos.tasks.find_by_id(task_id).await? else {
            return Ok(false);
        };
        let contract = self.contract_of_task(&task).await?;

        // Overlay first: the cheap check short-circuits the role branches.
        if let Some(overlay) = ctx.overlay() {
            if overlay.covers_task(&task.departments, contract.region_id) {
                tracing::debug!(user_id = %ctx.user_id, task = %task.id, "overlay grant");
                return Ok(true);
            }
        }

        if !ctx.active {
            return Ok(false);
        }
        if ctx.role_level >= levels::ADMIN {
            return Ok(true);
        }
        if ctx.role_level >= levels::DIRECTOR {
            return Ok(ctx.region_id == Some(contract.region_id));
        }
        if ctx.role_level >= levels::MANAGER {
            return Ok(contract.manager_id == Some(ctx.user_id));
        }
        if ctx.role_level >= levels::EXECUTANT {
            return Ok(task.is_assignee(ctx.user_id) || task.created_by == ctx.user_id);
        }
        Ok(false)
    }

    pub async fn can_edit_task(&self, ctx: &AccessContext, task_id: Uuid) -> AppResult<bool> {
        let Some(task) = self.repos.tasks.find_by_id(task_id).await? else {
            return Ok(false);
        };
        let contract = self.contract_of_task(&task).await?;

        if let Some(overlay) = ctx.overlay() {
            if overlay.covers_task(&task.departments, contract.region_id) {
                tracing::debug!(user_id = %ctx.user_id, task = %task.id, "overlay grant");
                return Ok(true);
            }
        }

        // Task edits through the overlay require the department match above;
        // the region-only grant applies to create flows only.
        Ok(self.base_allowed_on_contract(ctx, &contract))
    }

    pub async fn can_delete_task(&self, ctx: &AccessContext, task_id: Uuid) -> AppResult<bool> {
        self.can_edit_task(ctx, task_id).await
    }

    pub async fn can_edit_issue(&self, ctx: &AccessContext, issue_id: Uuid) -> AppResult<bool> {
        let Some(issue) = self.repos.issues.find_by_id(issue_id).await? else {
            return Ok(false);
        };
        if !ctx.active {
            return Ok(false);
        }
        if ctx.role_level >= levels::ADMIN {
            return Ok(true);
        }
        match issue.region_id {
            // Global issues never open up below admin.
            None => Ok(false),
            Some(region) if ctx.role_level >= levels::DIRECTOR => {
                Ok(ctx.region_id == Some(region))
            }
            Some(_) => Ok(false),
        }
    }

    pub async fn can_delete_issue(&self, ctx: &AccessContext, issue_id: Uuid) -> AppResult<bool> {
        self.can_edit_issue(ctx, issue_id).await
    }

    /// The one action with no role-level fallback and no overlay.
    pub async fn can_archive_issue(&self, ctx: &AccessContext, issue_id: Uuid) -> AppResult<bool> {
        let Some(_issue) = self.repos.issues.find_by_id(issue_id).await? else {
            return Ok(false);
        };
        Ok(ctx.at_least(levels::ADMIN))
    }

    pub async fn can_edit_user(&self, ctx: &AccessContext, target_id: Uuid) -> AppResult<bool> {
        let Some(target) = self.repos.users.find_by_id(target_id).await? else {
            return Ok(false);
        };
        if !ctx.active {
            return Ok(false);
        }
        if ctx.role_level >= levels::ADMIN {
            return Ok(true);
        }
        if ctx.role_level >= levels::DIRECTOR {
            // Unscoped users are visible to directors but not editable.
            return Ok(ctx.region_id.is_some() && target.region_id == ctx.region_id);
        }
        Ok(false)
    }

    /// Dispatcher over (action, kind). For `Create`, `target` carries the
    /// parent-scope hint (contract region, parent contract, parent
    /// subdivision, issue region); `None` means "form access only", the
    /// original system's null-hint mode.
    pub async fn can(
        &self,
        ctx: &AccessContext,
        action: Action,
        kind: EntityKind,
        target: Option<Uuid>,
    ) -> AppResult<bool> {
        let allowed = match (action, target) {
            (Action::Create, None) => self.can_access_create_form(ctx, kind),
            (Action::Create, Some(target)) => match kind {
                EntityKind::Contract => self.can_create_contract(ctx, target).await?,
                EntityKind::Subdivision => self.can_create_subdivision(ctx, target).await?,
                EntityKind::Task => self.can_create_task(ctx, target).await?,
                EntityKind::Issue => self.can_create_issue(ctx, Some(target)).await?,
                EntityKind::User => false,
            },
            (Action::Edit | Action::Delete, Some(target)) => match kind {
                EntityKind::Contract => self.can_edit_contract(ctx, target).await?,
                EntityKind::Subdivision => self.can_edit_subdivision(ctx, target).await?,
                EntityKind::Task => self.can_edit_task(ctx, target).await?,
                EntityKind::Issue => self.can_edit_issue(ctx, target).await?,
                EntityKind::User => self.can_edit_user(ctx, target).await?,
            },
            (Action::Archive, Some(target)) => match kind {
                EntityKind::Issue => self.can_archive_issue(ctx, target).await?,
                _ => false,
            },
            // Edit/delete/archive need a concrete target.
            (_, None) => false,
        };
        tracing::debug!(
            user_id = %ctx.user_id,
            action = %action,
            kind = %kind,
            allowed,
            "permission resolved"
        );
        Ok(allowed)
    }

    /// Convenience entry point taking a bare user id; a missing user is a
    /// plain denial.
    pub async fn can_for_user(
        &self,
        user_id: Uuid,
        action: Action,
        kind: EntityKind,
        target: Option<Uuid>,
    ) -> AppResult<bool> {
        match AccessContext::load(&self.repos, user_id).await {
            Ok(ctx) => self.can(&ctx, action, kind, target).await,
            Err(AppError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Resolve and enforce in one step, honoring the configured
    /// [`AuthzMode`].
    pub async fn require(
        &self,
        ctx: &AccessContext,
        action: Action,
        kind: EntityKind,
        target: Option<Uuid>,
    ) -> AppResult<()> {
        let allowed = self.can(ctx, action, kind, target).await?;
        AuthzMode::from_env().enforce(allowed, &format!("{action} {kind}"))
    }

    /// Shared region/ownership test for contract-anchored create/edit flows:
    /// the base-role test plus the head overlay's region-only grant (the
    /// department match is established at the contract level in these flows).
    fn allowed_on_contract(&self, ctx: &AccessContext, contract: &Contract) -> bool {
        if let Some(overlay) = ctx.overlay() {
            if overlay.covers_region(contract.region_id) {
                return true;
            }
        }
        self.base_allowed_on_contract(ctx, contract)
    }

    /// Base-role region/ownership test: admin, director in the contract's
    /// region, or the owning manager.
    fn base_allowed_on_contract(&self, ctx: &AccessContext, contract: &Contract) -> bool {
        if !ctx.active {
            return false;
        }
        if ctx.role_level >= levels::ADMIN {
            return true;
        }
        if ctx.role_level >= levels::DIRECTOR {
            return ctx.region_id == Some(contract.region_id);
        }
        if ctx.role_level >= levels::MANAGER {
            return contract.manager_id == Some(ctx.user_id);
        }
        false
    }

    async fn contract_of_subdivision(&self, subdivision: &Subdivision) -> AppResult<Contract> {
        self.repos
            .contracts
            .find_by_id(subdivision.contract_id)
            .await?
            .ok_or_else(|| {
                AppError::integrity(format!(
                    "subdivision {} references missing contract {}",
                    subdivision.id, subdivision.contract_id
                ))
            })
    }

    async fn contract_of_task(&self, task: &Task) -> AppResult<Contract> {
        let subdivision = self
            .repos
            .subdivisions
            .find_by_id(task.subdivision_id)
            .await?
            .ok_or_else(|| {
                AppError::integrity(format!(
                    "task {} references missing subdivision {}",
                    task.id, task.subdivision_id
                ))
            })?;
        self.contract_of_subdivision(&subdivision).await
    }
}
