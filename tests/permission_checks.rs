use uuid::Uuid;

use regdesk::authz::{Action, EntityKind, PermissionResolver};
use regdesk::models::Role;
use regdesk::AppError;

mod common;
use common::*;

#[tokio::test]
async fn create_form_access_and_save_time_checks_are_distinct() {
    let (repos, store) = world();
    let region_a = seed_region(&store, "North");
    let region_b = seed_region(&store, "South");
    let director = seed_user(&store, Role::Director, Some(region_a.id));

    let permissions = PermissionResolver::new(repos.clone());
    let ctx = ctx(&repos, &director).await;

    // the form is reachable before any target region is known
    assert!(permissions.can_access_create_form(&ctx, EntityKind::Contract));
    // saving is checked against the concrete region
    assert!(permissions
        .can_create_contract(&ctx, region_a.id)
        .await
        .unwrap());
    assert!(!permissions
        .can_create_contract(&ctx, region_b.id)
        .await
        .unwrap());

    // the dispatcher keeps the original null-hint split
    assert!(permissions
        .can(&ctx, Action::Create, EntityKind::Contract, None)
        .await
        .unwrap());
    assert!(!permissions
        .can(&ctx, Action::Create, EntityKind::Contract, Some(region_b.id))
        .await
        .unwrap());
}

#[tokio::test]
async fn regionless_director_is_denied_every_permission() {
    let (repos, store) = world();
    let region = seed_region(&store, "North");
    let director = seed_user(&store, Role::Director, None);

    let contract = seed_contract(&store, region.id, None);
    let sub = seed_subdivision(&store, contract.id);
    let task = seed_task(&store, sub.id, director.id);
    let issue = seed_issue(&store, Some(region.id), director.id);

    let permissions = PermissionResolver::new(repos.clone());
    let ctx = ctx(&repos, &director).await;

    assert!(!permissions.can_access_create_form(&ctx, EntityKind::Contract));
    assert!(!permissions
        .can_create_contract(&ctx, region.id)
        .await
        .unwrap());
    assert!(!permissions.can_edit_contract(&ctx, contract.id).await.unwrap());
    assert!(!permissions.can_edit_subdivision(&ctx, sub.id).await.unwrap());
    assert!(!permissions.can_edit_task(&ctx, task.id).await.unwrap());
    assert!(!permissions.can_edit_issue(&ctx, issue.id).await.unwrap());
}

#[tokio::test]
async fn delete_mirrors_edit_for_every_entity() {
    let (repos, store) = world();
    let region_a = seed_region(&store, "North");
    let region_b = seed_region(&store, "South");

    let admin = seed_user(&store, Role::Admin, None);
    let director = seed_user(&store, Role::Director, Some(region_a.id));
    let foreign_director = seed_user(&store, Role::Director, Some(region_b.id));
    let manager = seed_user(&store, Role::Manager, Some(region_a.id));
    let executant = seed_user(&store, Role::Executant, Some(region_a.id));

    let contract = seed_contract(&store, region_a.id, Some(manager.id));
    let sub = seed_subdivision(&store, contract.id);
    let task = seed_task(&store, sub.id, manager.id);
    let issue = seed_issue(&store, Some(region_a.id), director.id);

    let permissions = PermissionResolver::new(repos.clone());

    for user in [&admin, &director, &foreign_director, &manager, &executant] {
        let ctx = ctx(&repos, user).await;
        assert_eq!(
            permissions.can_edit_contract(&ctx, contract.id).await.unwrap(),
            permissions
                .can_delete_contract(&ctx, contract.id)
                .await
                .unwrap(),
        );
        assert_eq!(
            permissions.can_edit_subdivision(&ctx, sub.id).await.unwrap(),
            permissions
                .can_delete_subdivision(&ctx, sub.id)
                .await
                .unwrap(),
        );
        assert_eq!(
            permissions.can_edit_task(&ctx, task.id).await.unwrap(),
            permissions.can_delete_task(&ctx, task.id).await.unwrap(),
        );
        assert_eq!(
            permissions.can_edit_issue(&ctx, issue.id).await.unwrap(),
            permissions.can_delete_issue(&ctx, issue.id).await.unwrap(),
        );
    }
}

#[tokio::test]
async fn archive_is_admin_only() {
    let (repos, store) = world();
    let region = seed_region(&store, "North");
    let admin = seed_user(&store, Role::Admin, None);
    let director = seed_user(&store, Role::Director, Some(region.id));
    let manager = seed_user(&store, Role::Manager, Some(region.id));

    // the director created the issue in their own region and still may not
    // archive it
    let issue = seed_issue(&store, Some(region.id), director.id);

    let permissions = PermissionResolver::new(repos.clone());

    let admin_ctx = ctx(&repos, &admin).await;
    assert!(permissions
        .can_archive_issue(&admin_ctx, issue.id)
        .await
        .unwrap());

    let director_ctx = ctx(&repos, &director).await;
    assert!(permissions.can_edit_issue(&director_ctx, issue.id).await.unwrap());
    assert!(!permissions
        .can_archive_issue(&director_ctx, issue.id)
        .await
        .unwrap());

    let manager_ctx = ctx(&repos, &manager).await;
    assert!(!permissions
        .can_archive_issue(&manager_ctx, issue.id)
        .await
        .unwrap());

    // dispatcher form
    assert!(!permissions
        .can(&director_ctx, Action::Archive, EntityKind::Issue, Some(issue.id))
        .await
        .unwrap());
}

#[tokio::test]
async fn manager_owns_tasks_but_not_the_contract_itself() {
    let (repos, store) = world();
    let region = seed_region(&store, "North");
    let manager = seed_user(&store, Role::Manager, Some(region.id));
    let other = seed_user(&store, Role::Manager, Some(region.id));

    let owned = seed_contract(&store, region.id, Some(manager.id));
    let foreign = seed_contract(&store, region.id, Some(other.id));
    let owned_sub = seed_subdivision(&store, owned.id);
    let foreign_sub = seed_subdivision(&store, foreign.id);
    let owned_task = seed_task(&store, owned_sub.id, manager.id);

    let permissions = PermissionResolver::new(repos.clone());
    let ctx = ctx(&repos, &manager).await;

    // contract-anchored creation follows ownership
    assert!(permissions
        .can_create_subdivision(&ctx, owned.id)
        .await
        .unwrap());
    assert!(!permissions
        .can_create_subdivision(&ctx, foreign.id)
        .await
        .unwrap());
    assert!(permissions
        .can_create_task(&ctx, owned_sub.id)
        .await
        .unwrap());
    assert!(!permissions
        .can_create_task(&ctx, foreign_sub.id)
        .await
        .unwrap());
    assert!(permissions.can_edit_task(&ctx, owned_task.id).await.unwrap());

    // but contracts themselves stay with directors and admins
    assert!(!permissions.can_edit_contract(&ctx, owned.id).await.unwrap());
    assert!(!permissions
        .can_create_contract(&ctx, region.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn executant_may_view_but_not_edit_their_tasks() {
    let (repos, store) = world();
    let region = seed_region(&store, "North");
    let manager = seed_user(&store, Role::Manager, Some(region.id));
    let executant = seed_user(&store, Role::Executant, Some(region.id));

    let contract = seed_contract(&store, region.id, Some(manager.id));
    let sub = seed_subdivision(&store, contract.id);
    let task = seed_task_with(&store, sub.id, manager.id, vec![executant.id], vec![]);

    let permissions = PermissionResolver::new(repos.clone());
    let ctx = ctx(&repos, &executant).await;

    assert!(permissions.can_view_task(&ctx, task.id).await.unwrap());
    assert!(!permissions.can_edit_task(&ctx, task.id).await.unwrap());
}

#[tokio::test]
async fn global_issues_stay_admin_territory() {
    let (repos, store) = world();
    let region = seed_region(&store, "North");
    let admin = seed_user(&store, Role::Admin, None);
    let director = seed_user(&store, Role::Director, Some(region.id));

    let global = seed_issue(&store, None, admin.id);

    let permissions = PermissionResolver::new(repos.clone());

    let admin_ctx = ctx(&repos, &admin).await;
    assert!(permissions.can_edit_issue(&admin_ctx, global.id).await.unwrap());
    assert!(permissions.can_create_issue(&admin_ctx, None).await.unwrap());

    let director_ctx = ctx(&repos, &director).await;
    assert!(!permissions
        .can_edit_issue(&director_ctx, global.id)
        .await
        .unwrap());
    assert!(!permissions.can_create_issue(&director_ctx, None).await.unwrap());
    // regional creation in their own region is fine
    assert!(permissions
        .can_create_issue(&director_ctx, Some(region.id))
        .await
        .unwrap());
}

#[tokio::test]
async fn director_edits_users_in_their_region_only() {
    let (repos, store) = world();
    let region_a = seed_region(&store, "North");
    let region_b = seed_region(&store, "South");
    let admin = seed_user(&store, Role::Admin, None);
    let director = seed_user(&store, Role::Director, Some(region_a.id));

    let local = seed_user(&store, Role::Executant, Some(region_a.id));
    let foreign = seed_user(&store, Role::Executant, Some(region_b.id));
    let unscoped = seed_user(&store, Role::Executant, None);

    let permissions = PermissionResolver::new(repos.clone());

    let director_ctx = ctx(&repos, &director).await;
    assert!(permissions
        .can_edit_user(&director_ctx, local.id)
        .await
        .unwrap());
    assert!(!permissions
        .can_edit_user(&director_ctx, foreign.id)
        .await
        .unwrap());
    // visible to the director, but not editable
    assert!(!permissions
        .can_edit_user(&director_ctx, unscoped.id)
        .await
        .unwrap());

    let admin_ctx = ctx(&repos, &admin).await;
    assert!(permissions.can_edit_user(&admin_ctx, unscoped.id).await.unwrap());
}

#[tokio::test]
async fn missing_users_and_targets_deny_instead_of_erroring() {
    let (repos, store) = world();
    let region = seed_region(&store, "North");
    let admin = seed_user(&store, Role::Admin, None);
    let contract = seed_contract(&store, region.id, None);

    let permissions = PermissionResolver::new(repos.clone());
    let admin_ctx = ctx(&repos, &admin).await;

    // absent target: plain denial even for an admin
    assert!(!permissions
        .can_edit_contract(&admin_ctx, Uuid::new_v4())
        .await
        .unwrap());
    assert!(!permissions
        .can_edit_task(&admin_ctx, Uuid::new_v4())
        .await
        .unwrap());

    // absent user: plain denial through the id-based entry point
    assert!(!permissions
        .can_for_user(
            Uuid::new_v4(),
            Action::Edit,
            EntityKind::Contract,
            Some(contract.id),
        )
        .await
        .unwrap());
}

#[tokio::test]
async fn dangling_parent_reference_surfaces_as_integrity_error() {
    let (repos, store) = world();
    let region = seed_region(&store, "North");
    let admin = seed_user(&store, Role::Admin, None);

    let contract = seed_contract(&store, region.id, None);
    let sub = seed_subdivision(&store, contract.id);
    let task = seed_task(&store, sub.id, admin.id);

    // sever the chain underneath the task
    store.remove_subdivision(sub.id);

    let permissions = PermissionResolver::new(repos.clone());
    let admin_ctx = ctx(&repos, &admin).await;

    let err = permissions.can_edit_task(&admin_ctx, task.id).await.unwrap_err();
    assert!(matches!(err, AppError::Integrity(_)));
}

#[tokio::test]
async fn inactive_user_fails_every_check() {
    let (repos, store) = world();
    let region = seed_region(&store, "North");
    let admin = seed_user(&store, Role::Admin, None);
    let admin = deactivate(&store, &admin);

    let contract = seed_contract(&store, region.id, None);

    let permissions = PermissionResolver::new(repos.clone());
    let ctx = ctx(&repos, &admin).await;

    assert!(!permissions.can_access_create_form(&ctx, EntityKind::Contract));
    assert!(!permissions.can_edit_contract(&ctx, contract.id).await.unwrap());
    assert!(!permissions
        .can_create_contract(&ctx, region.id)
        .await
        .unwrap());
}
