//! Project team membership model and DTOs.

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_members` table.
///
/// `role` is free text at the storage layer; permission decisions always go
/// through `atelier_core::roles::normalize_role_label` first.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding or re-roling a member (upsert semantics: at most one role
/// per (project, user) pair).
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertMember {
    pub user_id: DbId,
    pub role: String,
}

/// The single-read projection used for role resolution: the project's owner
/// plus the caller's membership label, if any.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectAccess {
    pub created_by: DbId,
    pub member_role: Option<String>,
}
