//! Integration tests for cascading project deletion.

mod common;

use atelier_core::audit::actions;
use atelier_db::models::activity::ActivityQuery;
use atelier_db::models::file::CreateFile;
use atelier_db::repositories::{
    ActivityLogRepo, FileRepo, MemberRepo, ProjectRepo, TaskRepo,
};
use atelier_engine::deletion::ProjectDeletionService;
use common::{add_member, entry_count, seed_project, seed_task, seed_user};
use sqlx::PgPool;

async fn seed_file(pool: &PgPool, project_id: i64, user_id: i64, name: &str) -> i64 {
    FileRepo::create(
        pool,
        user_id,
        &CreateFile {
            project_id,
            task_id: None,
            file_name: name.to_string(),
            content_type: None,
            size_bytes: 100,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Test: owner deletion cascades across tasks, files, and memberships
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_owner_delete_cascades(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let project = seed_project(&pool, alice.id).await;
    let t1 = seed_task(&pool, project.id, alice.id, "Task one").await;
    let t2 = seed_task(&pool, project.id, alice.id, "Task two").await;
    let f1 = seed_file(&pool, project.id, alice.id, "brief.pdf").await;
    add_member(&pool, project.id, bob.id, "manager").await;

    let deleted = ProjectDeletionService::delete(&pool, project.id, alice.id)
        .await
        .unwrap();
    assert!(deleted);

    // Project: soft-deleted, history preserved.
    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_none());
    let row = ProjectRepo::find_by_id_include_deleted(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert!(row.deleted_at.is_some());

    // Tasks and files: soft-deleted.
    for task_id in [t1.id, t2.id] {
        assert!(TaskRepo::find_by_id(&pool, task_id).await.unwrap().is_none());
        let task = TaskRepo::find_by_id_include_deleted(&pool, task_id)
            .await
            .unwrap()
            .unwrap();
        assert!(task.deleted_at.is_some());
    }
    assert!(FileRepo::find_by_id(&pool, f1).await.unwrap().is_none());
    assert!(FileRepo::find_by_id_include_deleted(&pool, f1)
        .await
        .unwrap()
        .unwrap()
        .deleted_at
        .is_some());

    // Memberships: hard-deleted.
    let members = MemberRepo::list_by_project(&pool, project.id).await.unwrap();
    assert!(members.is_empty());
}

// ---------------------------------------------------------------------------
// Test: the deletion ledger entry carries cascade counts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_ledger_entry_counts_cascade(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let project = seed_project(&pool, alice.id).await;
    seed_task(&pool, project.id, alice.id, "Task one").await;
    seed_file(&pool, project.id, alice.id, "brief.pdf").await;
    add_member(&pool, project.id, bob.id, "viewer").await;

    ProjectDeletionService::delete(&pool, project.id, alice.id)
        .await
        .unwrap();

    let entries = ActivityLogRepo::query(
        &pool,
        &ActivityQuery {
            action: Some(actions::PROJECT_DELETED.to_string()),
            project_id: Some(project.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(entries.len(), 1);
    let details = &entries[0].details;
    assert_eq!(details["tasks_deleted"], 1);
    assert_eq!(details["files_deleted"], 1);
    assert_eq!(details["members_removed"], 1);
}

// ---------------------------------------------------------------------------
// Test: non-owner deletion changes nothing and is recorded
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_non_owner_delete_changes_nothing(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let project = seed_project(&pool, alice.id).await;
    let task = seed_task(&pool, project.id, alice.id, "Survivor").await;
    add_member(&pool, project.id, bob.id, "manager").await;

    // Managers hold update but not delete.
    let deleted = ProjectDeletionService::delete(&pool, project.id, bob.id)
        .await
        .unwrap();
    assert!(!deleted);

    // No partial cascade is observable.
    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_some());
    assert!(TaskRepo::find_by_id(&pool, task.id).await.unwrap().is_some());
    assert_eq!(
        MemberRepo::list_by_project(&pool, project.id)
            .await
            .unwrap()
            .len(),
        1
    );

    // The denied write is in the ledger.
    assert_eq!(entry_count(&pool, actions::AUTHZ_DENIED, Some(project.id)).await, 1);
    assert_eq!(entry_count(&pool, actions::PROJECT_DELETED, Some(project.id)).await, 0);
}

// ---------------------------------------------------------------------------
// Test: missing project deletes nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_missing_project_returns_false(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;

    let deleted = ProjectDeletionService::delete(&pool, 999_999, alice.id)
        .await
        .unwrap();
    assert!(!deleted);
    assert_eq!(entry_count(&pool, actions::AUTHZ_DENIED, None).await, 0);
}

// ---------------------------------------------------------------------------
// Test: deleting twice reports false the second time
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_second_delete_returns_false(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;

    assert!(ProjectDeletionService::delete(&pool, project.id, alice.id)
        .await
        .unwrap());
    assert!(!ProjectDeletionService::delete(&pool, project.id, alice.id)
        .await
        .unwrap());

    // Exactly one deletion entry.
    assert_eq!(
        entry_count(&pool, actions::PROJECT_DELETED, Some(project.id)).await,
        1
    );
}

// ---------------------------------------------------------------------------
// Test: already-deleted tasks are not double-counted by the cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_cascade_skips_already_deleted_children(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;
    let keep = seed_task(&pool, project.id, alice.id, "Live until cascade").await;
    let gone = seed_task(&pool, project.id, alice.id, "Deleted beforehand").await;
    TaskRepo::soft_delete(&pool, gone.id).await.unwrap();

    ProjectDeletionService::delete(&pool, project.id, alice.id)
        .await
        .unwrap();

    let entries = ActivityLogRepo::query(
        &pool,
        &ActivityQuery {
            action: Some(actions::PROJECT_DELETED.to_string()),
            project_id: Some(project.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(entries[0].details["tasks_deleted"], 1);

    assert!(TaskRepo::find_by_id(&pool, keep.id).await.unwrap().is_none());
}
