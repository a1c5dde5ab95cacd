//! Authorization core: visibility scopes and permission resolution.
//!
//! Every decision is a pure function of an [`AccessContext`] snapshot and
//! already-loaded entity state:
//! - role-level thresholds over the *stored* `role_level` (the stored value
//!   wins even when it disagrees with the role catalog)
//! - fail-closed region scoping (a director without a region gets nothing)
//! - a department-head overlay unioned with the base-role result
//! - configurable enforcement modes (off/advisory/strict) for the
//!   `require` helper

mod context;
mod heads;
mod overlay;
mod permission;
mod scope;
mod visibility;

pub use context::AccessContext;
pub use heads::DepartmentHeadService;
pub use overlay::HeadOverlay;
pub use permission::PermissionResolver;
pub use scope::{Action, EntityKind, Scope};
pub use visibility::VisibilityResolver;

use std::sync::OnceLock;

use crate::errors::{AppError, AppResult};

/// Authorization enforcement mode for the `require` helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthzMode {
    /// No enforcement (development mode)
    Off,
    /// Log denials but allow the action (testing mode)
    Advisory,
    /// Deny with an error (production mode, the default)
    Strict,
}

impl AuthzMode {
    pub fn from_env() -> Self {
        static MODE: OnceLock<AuthzMode> = OnceLock::new();
        *MODE.get_or_init(|| {
            match std::env::var("AUTHZ_MODE")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "off" => AuthzMode::Off,
                "advisory" => AuthzMode::Advisory,
                _ => AuthzMode::Strict,
            }
        })
    }

    /// Apply the mode to a resolved decision.
    pub fn enforce(self, allowed: bool, what: &str) -> AppResult<()> {
        match self {
            AuthzMode::Off => Ok(()),
            AuthzMode::Advisory => {
                if !allowed {
                    tracing::warn!(action = %what, "denied (advisory mode, allowing)");
                }
                Ok(())
            }
            AuthzMode::Strict => {
                if allowed {
                    Ok(())
                } else {
                    tracing::warn!(action = %what, "denied");
                    Err(AppError::forbidden(what))
                }
            }
        }
    }
}
