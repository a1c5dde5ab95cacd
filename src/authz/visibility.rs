use uuid::Uuid;

use super::context::AccessContext;
use super::scope::{EntityKind, Scope};
use crate::errors::AppResult;
use crate::models::{levels, Task};
use crate::repos::Repositories;

/// Per-entity-type visibility resolution.
///
/// The `*_scope` functions are pure and return the descriptor form; the
/// `viewable_*` materializers translate a scope through the repositories
/// and union in the department-head overlay where it applies (tasks only).
#[derive(Clone)]
pub struct VisibilityResolver {
    repos: Repositories,
}

impl VisibilityResolver {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub fn contract_scope(&self, ctx: &AccessContext) -> Scope {
        if !ctx.active {
            return Scope::None;
        }
        if ctx.role_level >= levels::ADMIN {
            return Scope::All;
        }
        if ctx.role_level >= levels::DIRECTOR {
            // A director without a region gets nothing, never a fallback.
            return match ctx.region_id {
                Some(region) => Scope::Region(region),
                None => Scope::None,
            };
        }
        if ctx.role_level >= levels::MANAGER {
            return Scope::Owner(ctx.user_id);
        }
        Scope::None
    }

    /// Subdivisions inherit the contract rules; region and ownership resolve
    /// through the parent contract.
    pub fn subdivision_scope(&self, ctx: &AccessContext) -> Scope {
        self.contract_scope(ctx)
    }

    pub fn task_scope(&self, ctx: &AccessContext) -> Scope {
        if !ctx.active {
            return Scope::None;
        }
        if ctx.role_level >= levels::ADMIN {
            return Scope::All;
        }
        if ctx.role_level >= levels::DIRECTOR {
            return match ctx.region_id {
                Some(region) => Scope::Region(region),
                None => Scope::None,
            };
        }
        if ctx.role_level >= levels::MANAGER {
            return Scope::Owner(ctx.user_id);
        }
        if ctx.role_level >= levels::EXECUTANT {
            // assignee or creator
            return Scope::Owner(ctx.user_id);
        }
        Scope::None
    }

    pub fn issue_scope(&self, ctx: &AccessContext) -> Scope {
        if !ctx.active {
            return Scope::None;
        }
        if ctx.role_level >= levels::ADMIN {
            return Scope::All;
        }
        if ctx.role_level >= levels::DIRECTOR {
            // Region scope never includes global (region-less) issues.
            return match ctx.region_id {
                Some(region) => Scope::Region(region),
                None => Scope::None,
            };
        }
        Scope::None
    }

    pub async fn viewable_contracts(&self, ctx: &AccessContext) -> AppResult<Vec<Uuid>> {
        let contracts = match self.contract_scope(ctx) {
            Scope::All => self.repos.contracts.list_all().await?,
            Scope::Region(region) => self.repos.contracts.list_by_region(region).await?,
            Scope::Owner(user) => self.repos.contracts.list_by_manager(user).await?,
            Scope::None => Vec::new(),
        };
        Ok(sorted_ids(contracts.into_iter().map(|c| c.id)))
    }

    pub async fn viewable_subdivisions(&self, ctx: &AccessContext) -> AppResult<Vec<Uuid>> {
        let contracts = match self.subdivision_scope(ctx) {
            Scope::All => {
                let subdivisions = self.repos.subdivisions.list_all().await?;
                return Ok(sorted_ids(subdivisions.into_iter().map(|s| s.id)));
            }
            Scope::Region(region) => self.repos.contracts.list_by_region(region).await?,
            Scope::Owner(user) => self.repos.contracts.list_by_manager(user).await?,
            Scope::None => Vec::new(),
        };

        let mut ids = Vec::new();
        for contract in contracts {
            let subdivisions = self.repos.subdivisions.list_by_contract(contract.id).await?;
            ids.extend(subdivisions.into_iter().map(|s| s.id));
        }
        Ok(sorted_ids(ids))
    }

    /// Tasks visible to the context: the base-role scope unioned with the
    /// department-head overlay, deduplicated by id.
    pub async fn viewable_tasks(&self, ctx: &AccessContext) -> AppResult<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = Vec::new();

        if ctx.at_least(levels::ADMIN) {
            let tasks = self.repos.tasks.list_all().await?;
            return Ok(sorted_ids(tasks.into_iter().map(|t| t.id)));
        } else if ctx.at_least(levels::DIRECTOR) {
            if let Some(region) = ctx.region_id {
                ids.extend(self.tasks_in_region(region).await?.into_iter().map(|t| t.id));
            }
            // region-less director: base scope stays empty
        } else if ctx.at_least(levels::MANAGER) {
            let contracts = self.repos.contracts.list_by_manager(ctx.user_id).await?;
            for contract in contracts {
                ids.extend(
                    self.tasks_under_contract(contract.id)
                        .await?
                        .into_iter()
                        .map(|t| t.id),
                );
            }
        } else if ctx.at_least(levels::EXECUTANT) {
            let assigned = self.repos.tasks.list_by_assignee(ctx.user_id).await?;
            let created = self.repos.tasks.list_by_creator(ctx.user_id).await?;
            ids.extend(assigned.into_iter().map(|t| t.id));
            ids.extend(created.into_iter().map(|t| t.id));
        }

        if let Some(overlay) = ctx.overlay() {
            for &(department, region) in overlay.pairs() {
                for task in self.tasks_in_region(region).await? {
                    if task.in_department(department) {
                        ids.push(task.id);
                    }
                }
            }
        }

        Ok(sorted_ids(ids))
    }

    pub async fn viewable_issues(&self, ctx: &AccessContext) -> AppResult<Vec<Uuid>> {
        let issues = match self.issue_scope(ctx) {
            Scope::All => self.repos.issues.list_all().await?,
            Scope::Region(region) => self.repos.issues.list_by_region(region).await?,
            Scope::Owner(_) | Scope::None => Vec::new(),
        };
        Ok(sorted_ids(issues.into_iter().map(|i| i.id)))
    }

    /// User listing has no single scope descriptor: directors see their
    /// region plus every unscoped user; managers derive regions from their
    /// own contracts and additionally see unscoped users at executant level
    /// or above.
    pub async fn viewable_users(&self, ctx: &AccessContext) -> AppResult<Vec<Uuid>> {
        if !ctx.active {
            return Ok(Vec::new());
        }

        if ctx.role_level >= levels::ADMIN {
            let users = self.repos.users.list_all().await?;
            return Ok(sorted_ids(users.into_iter().map(|u| u.id)));
        }

        if ctx.role_level >= levels::DIRECTOR {
            let Some(region) = ctx.region_id else {
                return Ok(Vec::new());
            };
            let mut ids: Vec<Uuid> = Vec::new();
            ids.extend(
                self.repos
                    .users
                    .list_by_region(region)
                    .await?
                    .into_iter()
                    .map(|u| u.id),
            );
            ids.extend(
                self.repos
                    .users
                    .list_unscoped()
                    .await?
                    .into_iter()
                    .map(|u| u.id),
            );
            return Ok(sorted_ids(ids));
        }

        if ctx.role_level >= levels::MANAGER {
            let contracts = self.repos.contracts.list_by_manager(ctx.user_id).await?;
            let mut regions: Vec<Uuid> = contracts.into_iter().map(|c| c.region_id).collect();
            regions.sort();
            regions.dedup();

            let mut ids: Vec<Uuid> = Vec::new();
            for region in regions {
                ids.extend(
                    self.repos
                        .users
                        .list_by_region(region)
                        .await?
                        .into_iter()
                        .map(|u| u.id),
                );
            }
            ids.extend(
                self.repos
                    .users
                    .list_unscoped()
                    .await?
                    .into_iter()
                    .filter(|u| u.role_level >= levels::EXECUTANT)
                    .map(|u| u.id),
            );
            return Ok(sorted_ids(ids));
        }

        Ok(Vec::new())
    }

    /// Dispatcher over the entity kinds.
    pub async fn viewable(&self, ctx: &AccessContext, kind: EntityKind) -> AppResult<Vec<Uuid>> {
        let ids = match kind {
            EntityKind::Contract => self.viewable_contracts(ctx).await?,
            EntityKind::Subdivision => self.viewable_subdivisions(ctx).await?,
            EntityKind::Task => self.viewable_tasks(ctx).await?,
            EntityKind::Issue => self.viewable_issues(ctx).await?,
            EntityKind::User => self.viewable_users(ctx).await?,
        };
        tracing::debug!(
            user_id = %ctx.user_id,
            kind = %kind,
            count = ids.len(),
            "visibility resolved"
        );
        Ok(ids)
    }

    /// Convenience entry point taking a bare user id. An unresolvable user
    /// enumerates nothing; `AccessContext::load` is the erroring path.
    pub async fn viewable_for_user(&self, user_id: Uuid, kind: EntityKind) -> AppResult<Vec<Uuid>> {
        match AccessContext::load(&self.repos, user_id).await {
            Ok(ctx) => self.viewable(&ctx, kind).await,
            Err(crate::errors::AppError::NotFound(_)) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    async fn tasks_in_region(&self, region: Uuid) -> AppResult<Vec<Task>> {
        let mut tasks = Vec::new();
        for contract in self.repos.contracts.list_by_region(region).await? {
            tasks.extend(self.tasks_under_contract(contract.id).await?);
        }
        Ok(tasks)
    }

    async fn tasks_under_contract(&self, contract_id: Uuid) -> AppResult<Vec<Task>> {
        let mut tasks = Vec::new();
        for subdivision in self.repos.subdivisions.list_by_contract(contract_id).await? {
            tasks.extend(self.repos.tasks.list_by_subdivision(subdivision.id).await?);
        }
        Ok(tasks)
    }
}

fn sorted_ids(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    ids
}
