use uuid::Uuid;

use super::overlay::HeadOverlay;
use crate::errors::{AppError, AppResult};
use crate::models::{levels, DepartmentHeadAssignment, Role, User};
use crate::repos::Repositories;

/// Immutable snapshot of the acting user for one authorization decision.
///
/// Contexts are cheap and carry no invalidation logic: rebuild one per
/// decision if the underlying user record may have changed.
#[derive(Debug, Clone)]
pub struct AccessContext {
    pub user_id: Uuid,
    pub role: Role,
    /// The stored level, authoritative for every threshold check.
    pub role_level: i32,
    pub region_id: Option<Uuid>,
    pub active: bool,
    pub heads: HeadOverlay,
}

impl AccessContext {
    /// Load a context for `user_id`. Fails with `NotFound` when the id does
    /// not resolve; an inactive user still gets a context, which every
    /// resolver treats as zero access.
    pub async fn load(repos: &Repositories, user_id: Uuid) -> AppResult<Self> {
        let user = repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user {user_id} not found")))?;
        let assignments = repos.heads.list_by_user(user_id).await?;
        Ok(Self::for_user(&user, &assignments))
    }

    pub fn for_user(user: &User, assignments: &[DepartmentHeadAssignment]) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            role_level: user.role_level,
            region_id: user.region_id,
            active: user.active,
            heads: HeadOverlay::new(assignments),
        }
    }

    /// Threshold check over the stored level. Inactive users pass nothing.
    pub fn at_least(&self, level: i32) -> bool {
        self.active && self.role_level >= level
    }

    pub fn is_admin(&self) -> bool {
        self.at_least(levels::ADMIN)
    }

    /// The overlay, gated on the user being active.
    pub(crate) fn overlay(&self) -> Option<&HeadOverlay> {
        if self.active && !self.heads.is_empty() {
            Some(&self.heads)
        } else {
            None
        }
    }
}
