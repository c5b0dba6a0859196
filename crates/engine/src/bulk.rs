//! Bulk task operations: all-or-nothing admission, per-item mutation.
//!
//! The admission gate fails the entire batch when any referenced task is
//! missing or the caller lacks write access on any project touched. Once
//! admitted, each task runs in its own single-entity transaction with the
//! usual locking discipline -- one conflicting task cannot block or roll
//! back the others, at the cost of the batch only being atomic at the
//! admission boundary.

use std::collections::{HashMap, HashSet};

use atelier_core::audit::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::roles::Permission;
use atelier_core::status::TaskStatus;
use atelier_core::types::DbId;
use atelier_db::models::activity::CreateActivityLog;
use atelier_db::models::task::TaskProjectRef;
use atelier_db::repositories::TaskRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::audit::AuditRecorder;
use crate::error::{EngineError, EngineResult};
use crate::permission::PermissionResolver;
use crate::task_status::{transition_one, TransitionOrigin};

/// Why a single admitted task failed its mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkFailure {
    NotFound,
    InvalidTransition,
}

/// Per-task result of a bulk transition.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub task_id: DbId,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<BulkFailure>,
}

/// Result of a bulk status transition.
#[derive(Debug, Clone, Serialize)]
pub struct BulkTransitionReport {
    pub results: Vec<TaskOutcome>,
    pub updated_count: usize,
    pub failed_count: usize,
}

/// Result of a bulk deletion.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteReport {
    pub deleted_ids: Vec<DbId>,
    pub deleted_count: usize,
}

/// Executes status transitions and deletions across task batches.
pub struct BulkTaskService;

impl BulkTaskService {
    /// Transition every task in `task_ids` to `next`, reporting per-task
    /// outcomes.
    ///
    /// After admission, tasks are processed sequentially in input order,
    /// each in its own transaction. A task that fails its edge validation
    /// (or vanished since admission) is reported and skipped; the rest of
    /// the batch proceeds. Storage faults abort the remainder of the batch.
    /// Each successful transition appends its own ledger entry tagged as a
    /// bulk operation.
    pub async fn transition_statuses(
        pool: &PgPool,
        task_ids: &[DbId],
        next: TaskStatus,
        acting_user_id: DbId,
        reason: Option<&str>,
    ) -> EngineResult<BulkTransitionReport> {
        Self::admit(pool, task_ids, acting_user_id).await?;

        let mut results = Vec::with_capacity(task_ids.len());
        let mut updated_count = 0;
        let mut failed_count = 0;
        for &task_id in task_ids {
            let origin = TransitionOrigin::Bulk { reason };
            match transition_one(pool, task_id, next, acting_user_id, origin).await {
                Ok(_) => {
                    updated_count += 1;
                    results.push(TaskOutcome {
                        task_id,
                        ok: true,
                        reason: None,
                    });
                }
                Err(EngineError::Core(CoreError::NotFound { .. })) => {
                    failed_count += 1;
                    results.push(TaskOutcome {
                        task_id,
                        ok: false,
                        reason: Some(BulkFailure::NotFound),
                    });
                }
                Err(EngineError::Core(CoreError::InvalidTransition { .. })) => {
                    failed_count += 1;
                    results.push(TaskOutcome {
                        task_id,
                        ok: false,
                        reason: Some(BulkFailure::InvalidTransition),
                    });
                }
                Err(other) => return Err(other),
            }
        }

        Ok(BulkTransitionReport {
            results,
            updated_count,
            failed_count,
        })
    }

    /// Soft-delete every task in `task_ids`.
    ///
    /// Same admission gate and per-item isolation as transitions. Each
    /// deleted task appends its own ledger entry tagged as a bulk
    /// operation; a task that vanished since admission is simply absent
    /// from `deleted_ids`.
    pub async fn delete_tasks(
        pool: &PgPool,
        task_ids: &[DbId],
        acting_user_id: DbId,
    ) -> EngineResult<BulkDeleteReport> {
        let refs = Self::admit(pool, task_ids, acting_user_id).await?;
        let project_by_task: HashMap<DbId, DbId> =
            refs.iter().map(|r| (r.id, r.project_id)).collect();

        let mut deleted_ids = Vec::with_capacity(task_ids.len());
        for &task_id in task_ids {
            let mut tx = pool.begin().await?;
            if TaskRepo::soft_delete_in_tx(&mut *tx, task_id).await? {
                AuditRecorder::record_in_tx(
                    &mut *tx,
                    &CreateActivityLog {
                        user_id: Some(acting_user_id),
                        action: actions::TASK_DELETED.to_string(),
                        project_id: project_by_task.get(&task_id).copied(),
                        entity_type: Some(entity_types::TASK.to_string()),
                        entity_id: Some(task_id),
                        details: serde_json::json!({ "bulk": true }),
                    },
                )
                .await?;
                tx.commit().await?;
                deleted_ids.push(task_id);
            } else {
                tx.rollback().await?;
            }
        }

        Ok(BulkDeleteReport {
            deleted_count: deleted_ids.len(),
            deleted_ids,
        })
    }

    /// All-or-nothing admission gate.
    ///
    /// Every referenced task must exist (live), and the caller must hold
    /// write-task on every distinct project the batch touches. Any missing
    /// id fails the whole batch with `NotFound`; any denial fails it with
    /// `Forbidden` (recording the denial). Nothing is mutated here.
    async fn admit(
        pool: &PgPool,
        task_ids: &[DbId],
        acting_user_id: DbId,
    ) -> EngineResult<Vec<TaskProjectRef>> {
        let refs = TaskRepo::project_refs(pool, task_ids).await?;

        let found: HashSet<DbId> = refs.iter().map(|r| r.id).collect();
        for &task_id in task_ids {
            if !found.contains(&task_id) {
                return Err(CoreError::NotFound {
                    entity: "Task",
                    id: task_id,
                }
                .into());
            }
        }

        let mut project_ids: Vec<DbId> = refs.iter().map(|r| r.project_id).collect();
        project_ids.sort_unstable();
        project_ids.dedup();
        for project_id in project_ids {
            PermissionResolver::require(pool, project_id, acting_user_id, Permission::WriteTask)
                .await?;
        }

        Ok(refs)
    }
}
