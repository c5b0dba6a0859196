//! Repository for the `files` table (metadata only).

use atelier_core::types::DbId;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::file::{CreateFile, ProjectFile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, task_id, file_name, storage_key, content_type, \
    size_bytes, uploaded_by, deleted_at, created_at, updated_at";

/// Provides CRUD operations for file metadata.
pub struct FileRepo;

impl FileRepo {
    /// Register an uploaded file for `user_id`, returning the created row.
    ///
    /// A fresh storage key is generated here; the caller hands it to the
    /// external storage adapter.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateFile,
    ) -> Result<ProjectFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO files
                (project_id, task_id, file_name, storage_key, content_type, size_bytes, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(input.project_id)
            .bind(input.task_id)
            .bind(&input.file_name)
            .bind(Uuid::new_v4())
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a file by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a file by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = $1");
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all files of a project, newest first. Excludes soft-deleted rows.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM files
             WHERE project_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Soft-delete a file by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE files SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete every live file of a project, returning the count.
    pub async fn soft_delete_all_for_project(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE files SET deleted_at = NOW(), updated_at = NOW()
             WHERE project_id = $1 AND deleted_at IS NULL",
        )
        .bind(project_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }
}
