pub mod contract;
pub mod department;
pub mod issue;
pub mod region;
pub mod role;
pub mod subdivision;
pub mod task;
pub mod user;

pub use contract::{Contract, ContractStatus};
pub use department::{Department, DepartmentHeadAssignment, NewDepartmentHead};
pub use issue::{Issue, IssueStatus};
pub use region::Region;
pub use role::{levels, Role};
pub use subdivision::Subdivision;
pub use task::{Task, TaskStatus};
pub use user::User;
