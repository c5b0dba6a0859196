//! Repository for the `tasks` table.
//!
//! Status values always come from the `atelier-core` `TaskStatus` enum --
//! no magic numbers. Status writes are transaction-scoped because the
//! lifecycle engine validates under a row lock before writing.

use atelier_core::status::{ProjectPhase, StatusId, TaskStatus};
use atelier_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::task::{CreateTask, Task, TaskProjectRef, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, description, phase, status, assignee_id, \
    due_on, completed_at, created_by, deleted_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task created by `user_id`, returning the created row.
    ///
    /// New tasks always start in `pending`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (project_id, title, description, phase, status, assignee_id, due_on, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.phase)
            .bind(TaskStatus::Pending.id())
            .bind(input.assignee_id)
            .bind(input.due_on)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a task by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tasks of a project in creation order. Excludes soft-deleted
    /// rows.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE project_id = $1 AND deleted_at IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task's editable fields. Only non-`None` fields in `input`
    /// are applied; status is not updatable here.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                assignee_id = COALESCE($4, assignee_id),
                due_on = COALESCE($5, due_on),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.assignee_id)
            .bind(input.due_on)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a task by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Look up the owning project of each live task in `ids`.
    ///
    /// Missing or soft-deleted ids are simply absent from the result; the
    /// bulk admission gate compares against its input to spot them.
    pub async fn project_refs(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<TaskProjectRef>, sqlx::Error> {
        sqlx::query_as::<_, TaskProjectRef>(
            "SELECT id, project_id FROM tasks WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    // ── Transaction-scoped methods ────────────────────────────────────

    /// Read a live task row under a row lock (`SELECT ... FOR UPDATE`).
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE id = $1 AND deleted_at IS NULL
             FOR UPDATE"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Write a new status, returning the updated row.
    ///
    /// `completed_at` is set to now iff the new status is completed, and
    /// cleared otherwise.
    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status: TaskStatus,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                status = $2,
                completed_at = CASE WHEN $3 THEN NOW() ELSE NULL END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status.id())
            .bind(status == TaskStatus::Completed)
            .fetch_one(&mut *conn)
            .await
    }

    /// Soft-delete a task inside a caller-owned transaction. Returns `true`
    /// if a row was marked deleted.
    pub async fn soft_delete_in_tx(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Titles of all live tasks of a project tagged with `phase`.
    ///
    /// Used by template provisioning to skip titles that already exist.
    pub async fn titles_in_phase(
        conn: &mut PgConnection,
        project_id: DbId,
        phase: ProjectPhase,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT title FROM tasks
             WHERE project_id = $1 AND phase = $2 AND deleted_at IS NULL",
        )
        .bind(project_id)
        .bind(StatusId::from(phase))
        .fetch_all(&mut *conn)
        .await
    }

    /// Insert a phase-default template task: pending, unassigned,
    /// attributed to `created_by`.
    pub async fn insert_template(
        conn: &mut PgConnection,
        project_id: DbId,
        phase: ProjectPhase,
        title: &str,
        created_by: DbId,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, title, phase, status, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(title)
            .bind(StatusId::from(phase))
            .bind(TaskStatus::Pending.id())
            .bind(created_by)
            .fetch_one(&mut *conn)
            .await
    }

    /// Soft-delete every live task of a project, returning the count.
    pub async fn soft_delete_all_for_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NOW(), updated_at = NOW()
             WHERE project_id = $1 AND deleted_at IS NULL",
        )
        .bind(project_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }
}
