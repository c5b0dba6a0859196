//! Single-task status transitions.

use atelier_core::audit::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::status::TaskStatus;
use atelier_core::types::DbId;
use atelier_db::models::activity::CreateActivityLog;
use atelier_db::models::task::Task;
use atelier_db::repositories::TaskRepo;
use sqlx::PgPool;

use crate::audit::AuditRecorder;
use crate::error::EngineResult;

/// Where a transition request came from; controls the ledger entry shape.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TransitionOrigin<'a> {
    Single,
    Bulk { reason: Option<&'a str> },
}

/// Applies validated status transitions to individual tasks.
pub struct TaskStatusService;

impl TaskStatusService {
    /// Apply the transition `current -> next` to a task.
    ///
    /// Runs in one transaction: the task row is read under `FOR UPDATE`,
    /// the edge is validated against the state actually observed, and the
    /// write plus its ledger entry commit together. Of two concurrent
    /// attempts on the same task, the loser observes the winner's committed
    /// status and fails with `InvalidTransition`.
    pub async fn transition(
        pool: &PgPool,
        task_id: DbId,
        next: TaskStatus,
        acting_user_id: DbId,
    ) -> EngineResult<Task> {
        transition_one(pool, task_id, next, acting_user_id, TransitionOrigin::Single).await
    }
}

/// Shared single-task transition routine, also driven per-item by the bulk
/// executor.
pub(crate) async fn transition_one(
    pool: &PgPool,
    task_id: DbId,
    next: TaskStatus,
    acting_user_id: DbId,
    origin: TransitionOrigin<'_>,
) -> EngineResult<Task> {
    let mut tx = pool.begin().await?;

    let task = TaskRepo::find_by_id_for_update(&mut *tx, task_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        })?;

    let current = TaskStatus::from_id(task.status).ok_or_else(|| {
        CoreError::Internal(format!(
            "task {task_id} has unknown status id {}",
            task.status
        ))
    })?;
    current.validate_transition(next)?;

    let updated = TaskRepo::set_status(&mut *tx, task_id, next).await?;

    let mut details = serde_json::json!({
        "from": current.label(),
        "to": next.label(),
    });
    if let TransitionOrigin::Bulk { reason } = origin {
        details["bulk"] = true.into();
        if let Some(reason) = reason {
            details["reason"] = reason.into();
        }
    }
    AuditRecorder::record_in_tx(
        &mut *tx,
        &CreateActivityLog {
            user_id: Some(acting_user_id),
            action: actions::TASK_STATUS_CHANGED.to_string(),
            project_id: Some(task.project_id),
            entity_type: Some(entity_types::TASK.to_string()),
            entity_id: Some(task_id),
            details,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(updated)
}
