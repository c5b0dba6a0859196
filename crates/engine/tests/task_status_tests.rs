//! Integration tests for single-task status transitions.

mod common;

use assert_matches::assert_matches;
use atelier_core::audit::actions;
use atelier_core::error::CoreError;
use atelier_core::status::TaskStatus;
use atelier_db::models::activity::ActivityQuery;
use atelier_db::repositories::{ActivityLogRepo, TaskRepo};
use atelier_engine::task_status::TaskStatusService;
use atelier_engine::EngineError;
use common::{entry_count, force_task_status, seed_project, seed_task, seed_user};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: pending -> in_progress succeeds
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_pending_to_in_progress(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;
    let task = seed_task(&pool, project.id, alice.id, "Start me").await;

    let updated = TaskStatusService::transition(&pool, task.id, TaskStatus::InProgress, alice.id)
        .await
        .unwrap();

    assert_eq!(updated.status, TaskStatus::InProgress.id());
    assert!(updated.completed_at.is_none());

    let entries = entry_count(&pool, actions::TASK_STATUS_CHANGED, Some(project.id)).await;
    assert_eq!(entries, 1);
}

// ---------------------------------------------------------------------------
// Test: the full path to completed sets completed_at
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_completion_path_sets_completed_at(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;
    let task = seed_task(&pool, project.id, alice.id, "Finish me").await;

    TaskStatusService::transition(&pool, task.id, TaskStatus::InProgress, alice.id)
        .await
        .unwrap();
    let completed = TaskStatusService::transition(&pool, task.id, TaskStatus::Completed, alice.id)
        .await
        .unwrap();

    assert_eq!(completed.status, TaskStatus::Completed.id());
    assert!(
        completed.completed_at.is_some(),
        "completed_at must be set exactly when status is completed"
    );
}

// ---------------------------------------------------------------------------
// Test: pending -> completed always fails
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_pending_to_completed_rejected(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;
    let task = seed_task(&pool, project.id, alice.id, "No shortcuts").await;

    let err = TaskStatusService::transition(&pool, task.id, TaskStatus::Completed, alice.id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Core(CoreError::InvalidTransition {
            from: "pending",
            to: "completed",
        })
    );

    // Nothing changed, nothing was recorded.
    let unchanged = TaskRepo::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, TaskStatus::Pending.id());
    assert_eq!(
        entry_count(&pool, actions::TASK_STATUS_CHANGED, Some(project.id)).await,
        0
    );
}

// ---------------------------------------------------------------------------
// Test: completed is terminal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_completed_is_terminal(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;
    let task = seed_task(&pool, project.id, alice.id, "Done is done").await;
    force_task_status(&pool, task.id, TaskStatus::Completed).await;

    for next in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Blocked] {
        let err = TaskStatusService::transition(&pool, task.id, next, alice.id)
            .await
            .unwrap_err();
        assert_matches!(err, EngineError::Core(CoreError::InvalidTransition { .. }));
    }
}

// ---------------------------------------------------------------------------
// Test: blocked tasks resume through in_progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_blocked_resumes_through_in_progress(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;
    let task = seed_task(&pool, project.id, alice.id, "Stuck then unstuck").await;

    TaskStatusService::transition(&pool, task.id, TaskStatus::InProgress, alice.id)
        .await
        .unwrap();
    let blocked = TaskStatusService::transition(&pool, task.id, TaskStatus::Blocked, alice.id)
        .await
        .unwrap();
    assert_eq!(blocked.status, TaskStatus::Blocked.id());
    assert!(blocked.completed_at.is_none());

    // blocked -> completed is not an edge; it must resume first.
    let err = TaskStatusService::transition(&pool, task.id, TaskStatus::Completed, alice.id)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::InvalidTransition { .. }));

    TaskStatusService::transition(&pool, task.id, TaskStatus::InProgress, alice.id)
        .await
        .unwrap();
    let completed = TaskStatusService::transition(&pool, task.id, TaskStatus::Completed, alice.id)
        .await
        .unwrap();
    assert_eq!(completed.status, TaskStatus::Completed.id());
}

// ---------------------------------------------------------------------------
// Test: missing and soft-deleted tasks report NotFound
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_missing_or_deleted_task_not_found(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;

    let err = TaskStatusService::transition(&pool, 999_999, TaskStatus::InProgress, alice.id)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { entity: "Task", .. }));

    let task = seed_task(&pool, project.id, alice.id, "Gone").await;
    TaskRepo::soft_delete(&pool, task.id).await.unwrap();

    let err = TaskStatusService::transition(&pool, task.id, TaskStatus::InProgress, alice.id)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::NotFound { entity: "Task", .. }));
}

// ---------------------------------------------------------------------------
// Test: the ledger entry names the edge
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_ledger_entry_names_the_edge(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let project = seed_project(&pool, alice.id).await;
    let task = seed_task(&pool, project.id, alice.id, "Audited").await;

    TaskStatusService::transition(&pool, task.id, TaskStatus::InProgress, alice.id)
        .await
        .unwrap();

    let entries = ActivityLogRepo::query(
        &pool,
        &ActivityQuery {
            action: Some(actions::TASK_STATUS_CHANGED.to_string()),
            project_id: Some(project.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.user_id, Some(alice.id));
    assert_eq!(entry.entity_id, Some(task.id));
    assert_eq!(entry.details["from"], "pending");
    assert_eq!(entry.details["to"], "in_progress");
    assert!(entry.details.get("bulk").is_none());
}
