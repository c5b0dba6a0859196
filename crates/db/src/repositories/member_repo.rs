//! Repository for the `project_members` table.

use atelier_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::member::{ProjectAccess, ProjectMember, UpsertMember};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, user_id, role, created_at, updated_at";

/// Provides membership operations for project teams.
pub struct MemberRepo;

impl MemberRepo {
    /// Add a member or change an existing member's role (upsert on the
    /// (project, user) pair), returning the resulting row.
    ///
    /// The role label is stored as given (trimmed); the closed-set mapping
    /// happens at resolution time.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        input: &UpsertMember,
    ) -> Result<ProjectMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_members (project_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_project_members_project_user
             DO UPDATE SET role = EXCLUDED.role, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .bind(input.user_id)
            .bind(input.role.trim())
            .fetch_one(pool)
            .await
    }

    /// Remove a member from a project. Returns `true` if a row was removed.
    pub async fn remove(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all members of a project, oldest membership first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_members
             WHERE project_id = $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// The single read behind role resolution: the live project's owner id
    /// plus the caller's membership label, if any.
    ///
    /// Returns `None` when the project does not exist or is soft-deleted.
    pub async fn find_access(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<ProjectAccess>, sqlx::Error> {
        sqlx::query_as::<_, ProjectAccess>(
            "SELECT p.created_by, m.role AS member_role
             FROM projects p
             LEFT JOIN project_members m
               ON m.project_id = p.id AND m.user_id = $2
             WHERE p.id = $1 AND p.deleted_at IS NULL",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Hard-delete every membership row for a project, returning the count.
    ///
    /// Membership rows carry no independent history worth retaining, so the
    /// project-deletion cascade removes them outright.
    pub async fn delete_all_for_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
