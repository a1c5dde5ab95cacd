use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The set of entities an access context may enumerate, as a descriptor the
/// caller's data-access layer can translate into a query.
///
/// `Owner` is interpreted per entity and level: a manager owns contracts
/// (and everything under them) through `Contract.manager_id`; an executant
/// owns the tasks they are assigned to or created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    All,
    Region(Uuid),
    Owner(Uuid),
    None,
}

impl Scope {
    pub fn is_none(&self) -> bool {
        matches!(self, Scope::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Contract,
    Subdivision,
    Task,
    Issue,
    User,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Contract => "contract",
            EntityKind::Subdivision => "subdivision",
            EntityKind::Task => "task",
            EntityKind::Issue => "issue",
            EntityKind::User => "user",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Edit,
    Delete,
    Archive,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Archive => "archive",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
