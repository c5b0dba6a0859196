//! Role resolution and permission checks.
//!
//! A caller's effective role comes from exactly two sources -- project
//! ownership or an active membership row -- merged here with ownership
//! always taking precedence, even over a conflicting membership row. No
//! resolvable role means no access (fail closed).

use atelier_core::audit::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::roles::{normalize_role_label, Permission, ProjectRole};
use atelier_core::types::DbId;
use atelier_db::models::activity::CreateActivityLog;
use atelier_db::repositories::MemberRepo;
use sqlx::PgPool;

use crate::audit::AuditRecorder;
use crate::error::EngineResult;

/// Answers "who is this user on this project" and "may they do X".
pub struct PermissionResolver;

impl PermissionResolver {
    /// Resolve the caller's effective role on a project in one read.
    ///
    /// Returns `None` when the project does not exist, is soft-deleted, or
    /// the caller has neither ownership nor a membership row. Membership
    /// labels go through [`normalize_role_label`], so legacy free-text
    /// labels degrade to `member` instead of leaking into the matrix.
    pub async fn resolve_role(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> EngineResult<Option<ProjectRole>> {
        let access = MemberRepo::find_access(pool, project_id, user_id).await?;
        Ok(match access {
            None => None,
            Some(access) if access.created_by == user_id => Some(ProjectRole::Owner),
            Some(access) => access.member_role.as_deref().map(normalize_role_label),
        })
    }

    /// Whether the caller holds `permission` on the project. Fail closed:
    /// no role resolves to `false`.
    pub async fn has_permission(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        permission: Permission,
    ) -> EngineResult<bool> {
        let role = Self::resolve_role(pool, project_id, user_id).await?;
        Ok(role.is_some_and(|r| r.allows(permission)))
    }

    /// Resolve and demand `permission`, returning the caller's role.
    ///
    /// A refusal records an `authz_denied` ledger entry (best-effort, never
    /// altering the failure) and returns `Forbidden`. Every engine write
    /// path goes through here.
    pub async fn require(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        permission: Permission,
    ) -> EngineResult<ProjectRole> {
        match Self::resolve_role(pool, project_id, user_id).await? {
            Some(role) if role.allows(permission) => Ok(role),
            resolved => {
                let entry = denial_entry(user_id, project_id, permission, resolved);
                AuditRecorder::record(pool, &entry).await;
                Err(CoreError::Forbidden(format!(
                    "{} permission denied on project {project_id}",
                    permission.label()
                ))
                .into())
            }
        }
    }
}

/// Build the `authz_denied` ledger entry for a refused permission check.
pub(crate) fn denial_entry(
    user_id: DbId,
    project_id: DbId,
    permission: Permission,
    resolved: Option<ProjectRole>,
) -> CreateActivityLog {
    CreateActivityLog {
        user_id: Some(user_id),
        action: actions::AUTHZ_DENIED.to_string(),
        project_id: Some(project_id),
        entity_type: Some(entity_types::PROJECT.to_string()),
        entity_id: Some(project_id),
        details: serde_json::json!({
            "permission": permission.label(),
            "role": resolved.map(ProjectRole::label),
        }),
    }
}
