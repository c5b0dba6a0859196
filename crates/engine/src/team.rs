//! Team membership management, gated on the manage-team permission.

use atelier_core::audit::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::roles::Permission;
use atelier_core::types::DbId;
use atelier_db::models::activity::CreateActivityLog;
use atelier_db::models::member::{ProjectMember, UpsertMember};
use atelier_db::repositories::{MemberRepo, UserRepo};
use sqlx::PgPool;

use crate::audit::AuditRecorder;
use crate::error::EngineResult;
use crate::permission::PermissionResolver;

/// Manages a project's team roster.
pub struct TeamService;

impl TeamService {
    /// Add a member or change an existing member's role (at most one role
    /// per (project, user) pair). Requires manage-team.
    ///
    /// The role label is stored as provided (trimmed); it is normalized
    /// into the closed role set only when permissions are resolved.
    pub async fn upsert_member(
        pool: &PgPool,
        project_id: DbId,
        acting_user_id: DbId,
        input: &UpsertMember,
    ) -> EngineResult<ProjectMember> {
        PermissionResolver::require(pool, project_id, acting_user_id, Permission::ManageTeam)
            .await?;
        UserRepo::find_by_id(pool, input.user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: input.user_id,
            })?;

        let member = MemberRepo::upsert(pool, project_id, input).await?;
        AuditRecorder::record(
            pool,
            &CreateActivityLog {
                user_id: Some(acting_user_id),
                action: actions::MEMBER_UPSERTED.to_string(),
                project_id: Some(project_id),
                entity_type: Some(entity_types::MEMBER.to_string()),
                entity_id: Some(member.user_id),
                details: serde_json::json!({
                    "member_user_id": member.user_id,
                    "role": member.role,
                }),
            },
        )
        .await;
        Ok(member)
    }

    /// Remove a member from a project. Requires manage-team. Returns `true`
    /// if a membership row was removed.
    pub async fn remove_member(
        pool: &PgPool,
        project_id: DbId,
        acting_user_id: DbId,
        member_user_id: DbId,
    ) -> EngineResult<bool> {
        PermissionResolver::require(pool, project_id, acting_user_id, Permission::ManageTeam)
            .await?;

        let removed = MemberRepo::remove(pool, project_id, member_user_id).await?;
        if removed {
            AuditRecorder::record(
                pool,
                &CreateActivityLog {
                    user_id: Some(acting_user_id),
                    action: actions::MEMBER_REMOVED.to_string(),
                    project_id: Some(project_id),
                    entity_type: Some(entity_types::MEMBER.to_string()),
                    entity_id: Some(member_user_id),
                    details: serde_json::json!({ "member_user_id": member_user_id }),
                },
            )
            .await;
        }
        Ok(removed)
    }

    /// List a project's members. Requires view; read denials are not
    /// written to the ledger.
    pub async fn list_members(
        pool: &PgPool,
        project_id: DbId,
        acting_user_id: DbId,
    ) -> EngineResult<Vec<ProjectMember>> {
        let allowed =
            PermissionResolver::has_permission(pool, project_id, acting_user_id, Permission::View)
                .await?;
        if !allowed {
            return Err(CoreError::Forbidden(format!(
                "view permission denied on project {project_id}"
            ))
            .into());
        }
        Ok(MemberRepo::list_by_project(pool, project_id).await?)
    }
}
