//! Repository for the `projects` table.
//!
//! Phase changes and owner-gated deletion are transaction-scoped methods
//! (`&mut PgConnection`) because the lifecycle engine must hold the row
//! lock across validate-then-write.

use atelier_core::status::{ProjectPhase, StatusId};
use atelier_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, name, description, current_phase, priority, \
    created_by, starts_on, deadline_on, deleted_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `user_id`, returning the created row.
    ///
    /// New projects always start in phase 1 (client acquisition). Priority
    /// defaults to 2 (medium) and `starts_on` to today when omitted.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (client_id, name, description, priority, created_by, starts_on, deadline_on)
             VALUES ($1, $2, $3, COALESCE($4, 2), $5, COALESCE($6, CURRENT_DATE), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.client_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.priority)
            .bind(user_id)
            .bind(input.starts_on)
            .bind(input.deadline_on)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects for a client, newest first. Excludes soft-deleted rows.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE client_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// List all projects, newest first. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied;
    /// the current phase is not updatable here.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                starts_on = COALESCE($5, starts_on),
                deadline_on = COALESCE($6, deadline_on),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.priority)
            .bind(input.starts_on)
            .bind(input.deadline_on)
            .fetch_optional(pool)
            .await
    }

    // ── Transaction-scoped methods ────────────────────────────────────

    /// Read a live project row under a row lock (`SELECT ... FOR UPDATE`).
    ///
    /// Concurrent lifecycle operations on the same project queue on this
    /// lock; the loser observes the winner's committed state.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE id = $1 AND deleted_at IS NULL
             FOR UPDATE"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Write a new current phase, returning the updated row.
    pub async fn set_phase(
        conn: &mut PgConnection,
        id: DbId,
        phase: ProjectPhase,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET current_phase = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(StatusId::from(phase))
            .fetch_one(&mut *conn)
            .await
    }

    /// Soft-delete a project iff it is live and owned by `owner_id`.
    ///
    /// Ownership check and deletion are one conditional UPDATE so they
    /// cannot race. Returns `true` if the row was marked deleted.
    pub async fn soft_delete_owned(
        conn: &mut PgConnection,
        id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND created_by = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
