//! File metadata model and DTOs.
//!
//! Only metadata lives here; the blob itself sits behind an external
//! storage adapter addressed by `storage_key`.

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file-metadata row from the `files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectFile {
    pub id: DbId,
    pub project_id: DbId,
    pub task_id: Option<DbId>,
    pub file_name: String,
    pub storage_key: Uuid,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_by: DbId,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering an uploaded file. The storage key is generated at
/// insert time; `uploaded_by` comes from the acting user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFile {
    pub project_id: DbId,
    pub task_id: Option<DbId>,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
}
