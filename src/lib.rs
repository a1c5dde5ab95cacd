pub mod authz;
pub mod errors;
pub mod events;
pub mod models;
pub mod repos;
pub mod workflow;

// Re-export commonly used items for embedders and tests
pub use authz::{
    AccessContext, Action, AuthzMode, DepartmentHeadService, EntityKind, HeadOverlay,
    PermissionResolver, Scope, VisibilityResolver,
};
pub use errors::{AppError, AppResult};
pub use workflow::TaskWorkflow;
