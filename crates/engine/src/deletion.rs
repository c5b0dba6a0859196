//! Cascading project deletion.

use atelier_core::audit::{actions, entity_types};
use atelier_core::roles::{Permission, ProjectRole};
use atelier_core::types::DbId;
use atelier_db::models::activity::CreateActivityLog;
use atelier_db::repositories::{FileRepo, MemberRepo, ProjectRepo, TaskRepo};
use sqlx::PgPool;

use crate::audit::AuditRecorder;
use crate::error::EngineResult;
use crate::permission::{denial_entry, PermissionResolver};

/// Soft-deletes a project and everything scoped under it, all-or-nothing.
pub struct ProjectDeletionService;

impl ProjectDeletionService {
    /// Delete a project owned by `acting_user_id`.
    ///
    /// Ownership check and deletion are a single conditional update, so an
    /// ownership check cannot race a later delete. On success, within the
    /// same transaction: every live task and file under the project is
    /// soft-deleted, every membership row is hard-deleted, and the ledger
    /// entry is appended. Returns `true` iff a project owned by the caller
    /// was deleted; any other outcome changes nothing.
    pub async fn delete(
        pool: &PgPool,
        project_id: DbId,
        acting_user_id: DbId,
    ) -> EngineResult<bool> {
        let mut tx = pool.begin().await?;

        if !ProjectRepo::soft_delete_owned(&mut *tx, project_id, acting_user_id).await? {
            tx.rollback().await?;
            // Nothing matched: the project is gone already, or the caller
            // is not the owner. Only the latter is a denied write.
            if let Some(role) =
                PermissionResolver::resolve_role(pool, project_id, acting_user_id).await?
            {
                if role != ProjectRole::Owner {
                    let entry =
                        denial_entry(acting_user_id, project_id, Permission::Delete, Some(role));
                    AuditRecorder::record(pool, &entry).await;
                }
            }
            return Ok(false);
        }

        let tasks_deleted = TaskRepo::soft_delete_all_for_project(&mut *tx, project_id).await?;
        let files_deleted = FileRepo::soft_delete_all_for_project(&mut *tx, project_id).await?;
        let members_removed = MemberRepo::delete_all_for_project(&mut *tx, project_id).await?;

        AuditRecorder::record_in_tx(
            &mut *tx,
            &CreateActivityLog {
                user_id: Some(acting_user_id),
                action: actions::PROJECT_DELETED.to_string(),
                project_id: Some(project_id),
                entity_type: Some(entity_types::PROJECT.to_string()),
                entity_id: Some(project_id),
                details: serde_json::json!({
                    "tasks_deleted": tasks_deleted,
                    "files_deleted": files_deleted,
                    "members_removed": members_removed,
                }),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            project_id,
            tasks_deleted,
            files_deleted,
            members_removed,
            "Project deleted"
        );
        Ok(true)
    }
}
