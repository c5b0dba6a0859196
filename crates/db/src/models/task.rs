//! Task entity model and DTOs.

use atelier_core::status::StatusId;
use atelier_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A task row from the `tasks` table.
///
/// `phase` records which project stage the task belongs to, independent of
/// the project's *current* phase. `completed_at` is non-null iff `status`
/// is completed; the lifecycle engine maintains that on every transition.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub phase: StatusId,
    pub status: StatusId,
    pub assignee_id: Option<DbId>,
    pub due_on: Option<NaiveDate>,
    pub completed_at: Option<Timestamp>,
    pub created_by: DbId,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new task. Status always starts at `pending`; status
/// changes go through the lifecycle engine only.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub phase: StatusId,
    pub assignee_id: Option<DbId>,
    pub due_on: Option<NaiveDate>,
}

/// DTO for updating an existing task. All fields are optional; status is
/// deliberately absent.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<DbId>,
    pub due_on: Option<NaiveDate>,
}

/// Minimal (task, project) projection used by the bulk admission gate.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct TaskProjectRef {
    pub id: DbId,
    pub project_id: DbId,
}
