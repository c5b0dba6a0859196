//! Administrator-gated user account operations.
//!
//! The administrator flag arrives on [`Identity`] from the external
//! credential service; it is a global flag and is never re-derived here.
//! User accounts are deactivated, never hard-deleted.

use atelier_core::audit::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::identity::Identity;
use atelier_core::types::DbId;
use atelier_db::models::activity::CreateActivityLog;
use atelier_db::models::user::User;
use atelier_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::audit::AuditRecorder;
use crate::error::EngineResult;

/// Account administration operations.
pub struct UserAdminService;

impl UserAdminService {
    /// Deactivate a user account. Requires the administrator flag.
    pub async fn deactivate(
        pool: &PgPool,
        acting: Identity,
        target_user_id: DbId,
    ) -> EngineResult<User> {
        Self::set_active(pool, acting, target_user_id, false, actions::USER_DEACTIVATED).await
    }

    /// Reactivate a deactivated user account. Requires the administrator
    /// flag.
    pub async fn reactivate(
        pool: &PgPool,
        acting: Identity,
        target_user_id: DbId,
    ) -> EngineResult<User> {
        Self::set_active(pool, acting, target_user_id, true, actions::USER_REACTIVATED).await
    }

    async fn set_active(
        pool: &PgPool,
        acting: Identity,
        target_user_id: DbId,
        is_active: bool,
        action: &str,
    ) -> EngineResult<User> {
        if !acting.is_admin {
            AuditRecorder::record(
                pool,
                &CreateActivityLog {
                    user_id: Some(acting.user_id),
                    action: actions::AUTHZ_DENIED.to_string(),
                    project_id: None,
                    entity_type: Some(entity_types::USER.to_string()),
                    entity_id: Some(target_user_id),
                    details: serde_json::json!({ "permission": "administer_users" }),
                },
            )
            .await;
            return Err(CoreError::Forbidden("administrator flag required".to_string()).into());
        }

        let user = UserRepo::set_active(pool, target_user_id, is_active)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: target_user_id,
            })?;

        AuditRecorder::record(
            pool,
            &CreateActivityLog {
                user_id: Some(acting.user_id),
                action: action.to_string(),
                project_id: None,
                entity_type: Some(entity_types::USER.to_string()),
                entity_id: Some(target_user_id),
                details: serde_json::json!({ "is_active": is_active }),
            },
        )
        .await;
        Ok(user)
    }
}
