use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Numeric role levels, the total order behind every ">=" threshold check.
pub mod levels {
    pub const ADMIN: i32 = 100;
    pub const DIRECTOR: i32 = 80;
    pub const DEPARTMENT_HEAD: i32 = 70;
    pub const MANAGER: i32 = 50;
    pub const EXECUTANT: i32 = 20;
    pub const AUDITOR: i32 = 10;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Director,
    DepartmentHead,
    Manager,
    Executant,
    Auditor,
}

impl Role {
    /// Catalog level of the role. Note that `User.role_level` stores its own
    /// copy of this value, and the stored copy wins in every check.
    pub const fn level(self) -> i32 {
        match self {
            Role::Admin => levels::ADMIN,
            Role::Director => levels::DIRECTOR,
            Role::DepartmentHead => levels::DEPARTMENT_HEAD,
            Role::Manager => levels::MANAGER,
            Role::Executant => levels::EXECUTANT,
            Role::Auditor => levels::AUDITOR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Director => "director",
            Role::DepartmentHead => "department_head",
            Role::Manager => "manager",
            Role::Executant => "executant",
            Role::Auditor => "auditor",
        }
    }

    /// Resolve a stored role name. An unknown name is a caller bug and fails
    /// loudly rather than defaulting to the bottom of the hierarchy.
    pub fn from_name(name: &str) -> Result<Role, AppError> {
        match name {
            "admin" => Ok(Role::Admin),
            "director" => Ok(Role::Director),
            "department_head" => Ok(Role::DepartmentHead),
            "manager" => Ok(Role::Manager),
            "executant" => Ok(Role::Executant),
            "auditor" => Ok(Role::Auditor),
            other => Err(AppError::UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
