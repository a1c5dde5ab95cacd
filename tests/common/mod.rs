#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use regdesk::authz::AccessContext;
use regdesk::models::{
    Contract, ContractStatus, Department, DepartmentHeadAssignment, Issue, IssueStatus, Region,
    Role, Subdivision, Task, TaskStatus, User,
};
use regdesk::repos::{DepartmentHeadRepository, InMemoryStore, Repositories};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("regdesk=debug")
        .try_init();
}

pub fn world() -> (Repositories, Arc<InMemoryStore>) {
    Repositories::in_memory()
}

pub fn seed_region(store: &InMemoryStore, name: &str) -> Region {
    let region = Region {
        id: Uuid::new_v4(),
        name: name.to_string(),
        manager_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.put_region(region.clone());
    region
}

pub fn seed_user(store: &InMemoryStore, role: Role, region_id: Option<Uuid>) -> User {
    seed_user_with_level(store, role, role.level(), region_id)
}

/// Seed a user whose stored level may disagree with the catalog.
pub fn seed_user_with_level(
    store: &InMemoryStore,
    role: Role,
    role_level: i32,
    region_id: Option<Uuid>,
) -> User {
    let id = Uuid::new_v4();
    let user = User {
        id,
        name: format!("{role} {id}"),
        email: format!("{id}@example.com"),
        role,
        role_level,
        region_id,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.put_user(user.clone());
    user
}

pub fn deactivate(store: &InMemoryStore, user: &User) -> User {
    let mut user = user.clone();
    user.active = false;
    store.put_user(user.clone());
    user
}

pub fn seed_contract(store: &InMemoryStore, region_id: Uuid, manager_id: Option<Uuid>) -> Contract {
    let contract = Contract {
        id: Uuid::new_v4(),
        title: "Road maintenance".to_string(),
        region_id,
        manager_id,
        status: ContractStatus::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.put_contract(contract.clone());
    contract
}

pub fn seed_subdivision(store: &InMemoryStore, contract_id: Uuid) -> Subdivision {
    let subdivision = Subdivision {
        id: Uuid::new_v4(),
        contract_id,
        name: "Section".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.put_subdivision(subdivision.clone());
    subdivision
}

pub fn seed_task(store: &InMemoryStore, subdivision_id: Uuid, created_by: Uuid) -> Task {
    seed_task_with(store, subdivision_id, created_by, vec![], vec![])
}

pub fn seed_task_with(
    store: &InMemoryStore,
    subdivision_id: Uuid,
    created_by: Uuid,
    assignees: Vec<Uuid>,
    departments: Vec<Uuid>,
) -> Task {
    let task = Task {
        id: Uuid::new_v4(),
        subdivision_id,
        title: "Survey the site".to_string(),
        status: TaskStatus::New,
        created_by,
        assignees,
        departments,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.put_task(task.clone());
    task
}

pub fn set_task_status(store: &InMemoryStore, task: &Task, status: TaskStatus) -> Task {
    let mut task = task.clone();
    task.status = status;
    store.put_task(task.clone());
    task
}

pub fn seed_issue(store: &InMemoryStore, region_id: Option<Uuid>, created_by: Uuid) -> Issue {
    let issue = Issue {
        id: Uuid::new_v4(),
        region_id,
        department_id: None,
        subject: "Missing paperwork".to_string(),
        status: IssueStatus::Open,
        created_by,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.put_issue(issue.clone());
    issue
}

pub fn seed_department(store: &InMemoryStore, name: &str) -> Department {
    let department = Department {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    store.put_department(department.clone());
    department
}

pub async fn seed_head(
    store: &InMemoryStore,
    user_id: Uuid,
    department_id: Uuid,
    region_id: Uuid,
) -> DepartmentHeadAssignment {
    store
        .insert(DepartmentHeadAssignment {
            user_id,
            department_id,
            region_id,
            created_at: Utc::now(),
        })
        .await
        .expect("seed head assignment")
}

pub async fn ctx(repos: &Repositories, user: &User) -> AccessContext {
    AccessContext::load(repos, user.id)
        .await
        .expect("load access context")
}
