//! Repository seams the resolvers consume.
//!
//! Persistence is a collaborator concern; the core only needs find-by-id,
//! find-by-filter, and list-by-parent accessors returning entity snapshots.
//! `memory::InMemoryStore` implements every trait for tests and embedding.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{
    Contract, Department, DepartmentHeadAssignment, Issue, Region, Subdivision, Task, TaskStatus,
    User,
};

pub mod memory;

pub use memory::InMemoryStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn list_all(&self) -> AppResult<Vec<User>>;
    async fn list_by_region(&self, region_id: Uuid) -> AppResult<Vec<User>>;
    /// Users with no region at all ("unscoped").
    async fn list_unscoped(&self) -> AppResult<Vec<User>>;
}

#[async_trait]
pub trait RegionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Region>>;
}

#[async_trait]
pub trait ContractRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contract>>;
    async fn list_all(&self) -> AppResult<Vec<Contract>>;
    async fn list_by_region(&self, region_id: Uuid) -> AppResult<Vec<Contract>>;
    async fn list_by_manager(&self, manager_id: Uuid) -> AppResult<Vec<Contract>>;
}

#[async_trait]
pub trait SubdivisionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subdivision>>;
    async fn list_all(&self) -> AppResult<Vec<Subdivision>>;
    async fn list_by_contract(&self, contract_id: Uuid) -> AppResult<Vec<Subdivision>>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>>;
    async fn list_all(&self) -> AppResult<Vec<Task>>;
    async fn list_by_subdivision(&self, subdivision_id: Uuid) -> AppResult<Vec<Task>>;
    async fn list_by_assignee(&self, user_id: Uuid) -> AppResult<Vec<Task>>;
    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Task>>;
    /// Compare-and-set status update. Returns `Conflict` when the stored
    /// status no longer matches `expected` (the transition lost a race).
    async fn update_status(
        &self,
        id: Uuid,
        expected: TaskStatus,
        next: TaskStatus,
    ) -> AppResult<Task>;
}

#[async_trait]
pub trait IssueRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Issue>>;
    async fn list_all(&self) -> AppResult<Vec<Issue>>;
    async fn list_by_region(&self, region_id: Uuid) -> AppResult<Vec<Issue>>;
}

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>>;
}

#[async_trait]
pub trait DepartmentHeadRepository: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<DepartmentHeadAssignment>>;
    async fn find_head(
        &self,
        department_id: Uuid,
        region_id: Uuid,
    ) -> AppResult<Option<DepartmentHeadAssignment>>;
    /// Insert guarding the one-head-per-(department, region) invariant.
    /// Returns `AssignmentConflict` when the pair already has a head.
    /// Implementations must serialize the check with the insert (a lock here,
    /// a unique constraint in a SQL store).
    async fn insert(
        &self,
        assignment: DepartmentHeadAssignment,
    ) -> AppResult<DepartmentHeadAssignment>;
    /// Remove an assignment; Ok(false) when nothing matched.
    async fn remove(&self, user_id: Uuid, department_id: Uuid, region_id: Uuid)
        -> AppResult<bool>;
}

/// Dependency-injection bundle handed to the resolvers and services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub regions: Arc<dyn RegionRepository>,
    pub contracts: Arc<dyn ContractRepository>,
    pub subdivisions: Arc<dyn SubdivisionRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub issues: Arc<dyn IssueRepository>,
    pub departments: Arc<dyn DepartmentRepository>,
    pub heads: Arc<dyn DepartmentHeadRepository>,
}

impl Repositories {
    /// A bundle backed by a single in-memory store; the store handle is
    /// returned alongside for seeding.
    pub fn in_memory() -> (Self, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        let repos = Self {
            users: store.clone(),
            regions: store.clone(),
            contracts: store.clone(),
            subdivisions: store.clone(),
            tasks: store.clone(),
            issues: store.clone(),
            departments: store.clone(),
            heads: store.clone(),
        };
        (repos, store)
    }
}
