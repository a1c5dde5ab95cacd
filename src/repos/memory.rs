//! In-memory repository backing for tests and embedded use.
//!
//! One store implements every repository trait; each collection sits behind
//! its own `RwLock`. The head-assignment uniqueness check and the task
//! status compare-and-set both run under a single write lock, which is the
//! in-process equivalent of the unique constraint / optimistic version a
//! SQL implementation would use.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    ContractRepository, DepartmentHeadRepository, DepartmentRepository, IssueRepository,
    RegionRepository, SubdivisionRepository, TaskRepository, UserRepository,
};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Contract, Department, DepartmentHeadAssignment, Issue, Region, Subdivision, Task, TaskStatus,
    User,
};

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    regions: RwLock<HashMap<Uuid, Region>>,
    contracts: RwLock<HashMap<Uuid, Contract>>,
    subdivisions: RwLock<HashMap<Uuid, Subdivision>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
    issues: RwLock<HashMap<Uuid, Issue>>,
    departments: RwLock<HashMap<Uuid, Department>>,
    heads: RwLock<Vec<DepartmentHeadAssignment>>,
}

impl InMemoryStore {
    pub fn put_user(&self, user: User) {
        self.users.write().unwrap().insert(user.id, user);
    }

    pub fn put_region(&self, region: Region) {
        self.regions.write().unwrap().insert(region.id, region);
    }

    pub fn put_contract(&self, contract: Contract) {
        self.contracts.write().unwrap().insert(contract.id, contract);
    }

    pub fn put_subdivision(&self, subdivision: Subdivision) {
        self.subdivisions
            .write()
            .unwrap()
            .insert(subdivision.id, subdivision);
    }

    pub fn put_task(&self, task: Task) {
        self.tasks.write().unwrap().insert(task.id, task);
    }

    pub fn put_issue(&self, issue: Issue) {
        self.issues.write().unwrap().insert(issue.id, issue);
    }

    pub fn put_department(&self, department: Department) {
        self.departments
            .write()
            .unwrap()
            .insert(department.id, department);
    }

    pub fn remove_subdivision(&self, id: Uuid) {
        self.subdivisions.write().unwrap().remove(&id);
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().unwrap().values().cloned().collect())
    }

    async fn list_by_region(&self, region_id: Uuid) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .filter(|u| u.region_id == Some(region_id))
            .cloned()
            .collect())
    }

    async fn list_unscoped(&self) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .filter(|u| u.region_id.is_none())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RegionRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Region>> {
        Ok(self.regions.read().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl ContractRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contract>> {
        Ok(self.contracts.read().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Contract>> {
        Ok(self.contracts.read().unwrap().values().cloned().collect())
    }

    async fn list_by_region(&self, region_id: Uuid) -> AppResult<Vec<Contract>> {
        Ok(self
            .contracts
            .read()
            .unwrap()
            .values()
            .filter(|c| c.region_id == region_id)
            .cloned()
            .collect())
    }

    async fn list_by_manager(&self, manager_id: Uuid) -> AppResult<Vec<Contract>> {
        Ok(self
            .contracts
            .read()
            .unwrap()
            .values()
            .filter(|c| c.manager_id == Some(manager_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SubdivisionRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subdivision>> {
        Ok(self.subdivisions.read().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Subdivision>> {
        Ok(self.subdivisions.read().unwrap().values().cloned().collect())
    }

    async fn list_by_contract(&self, contract_id: Uuid) -> AppResult<Vec<Subdivision>> {
        Ok(self
            .subdivisions
            .read()
            .unwrap()
            .values()
            .filter(|s| s.contract_id == contract_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        Ok(self.tasks.read().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Task>> {
        Ok(self.tasks.read().unwrap().values().cloned().collect())
    }

    async fn list_by_subdivision(&self, subdivision_id: Uuid) -> AppResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .unwrap()
            .values()
            .filter(|t| t.subdivision_id == subdivision_id)
            .cloned()
            .collect())
    }

    async fn list_by_assignee(&self, user_id: Uuid) -> AppResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .unwrap()
            .values()
            .filter(|t| t.is_assignee(user_id))
            .cloned()
            .collect())
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .unwrap()
            .values()
            .filter(|t| t.created_by == user_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: TaskStatus,
        next: TaskStatus,
    ) -> AppResult<Task> {
        let mut tasks = self.tasks.write().unwrap();
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("task not found"))?;

        if task.status != expected {
            return Err(AppError::conflict(format!(
                "task status moved to {} while the transition was in flight",
                task.status
            )));
        }

        task.status = next;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }
}

#[async_trait]
impl IssueRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Issue>> {
        Ok(self.issues.read().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Issue>> {
        Ok(self.issues.read().unwrap().values().cloned().collect())
    }

    async fn list_by_region(&self, region_id: Uuid) -> AppResult<Vec<Issue>> {
        Ok(self
            .issues
            .read()
            .unwrap()
            .values()
            .filter(|i| i.region_id == Some(region_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>> {
        Ok(self.departments.read().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl DepartmentHeadRepository for InMemoryStore {
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<DepartmentHeadAssignment>> {
        Ok(self
            .heads
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_head(
        &self,
        department_id: Uuid,
        region_id: Uuid,
    ) -> AppResult<Option<DepartmentHeadAssignment>> {
        Ok(self
            .heads
            .read()
            .unwrap()
            .iter()
            .find(|a| a.department_id == department_id && a.region_id == region_id)
            .cloned())
    }

    async fn insert(
        &self,
        assignment: DepartmentHeadAssignment,
    ) -> AppResult<DepartmentHeadAssignment> {
        // Uniqueness check and insert under one write lock.
        let mut heads = self.heads.write().unwrap();
        if heads
            .iter()
            .any(|a| a.department_id == assignment.department_id && a.region_id == assignment.region_id)
        {
            return Err(AppError::AssignmentConflict {
                department_id: assignment.department_id,
                region_id: assignment.region_id,
            });
        }
        heads.push(assignment.clone());
        Ok(assignment)
    }

    async fn remove(
        &self,
        user_id: Uuid,
        department_id: Uuid,
        region_id: Uuid,
    ) -> AppResult<bool> {
        let mut heads = self.heads.write().unwrap();
        let before = heads.len();
        heads.retain(|a| {
            !(a.user_id == user_id
                && a.department_id == department_id
                && a.region_id == region_id)
        });
        Ok(heads.len() != before)
    }
}
