//! Project entity model and DTOs.

use atelier_core::status::StatusId;
use atelier_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// `current_phase` and `priority` hold the `ProjectPhase` / `ProjectPriority`
/// discriminants from `atelier-core`. `created_by` is the implicit owner --
/// the creator holds the owner role without a membership row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub client_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub current_phase: StatusId,
    pub priority: StatusId,
    pub created_by: DbId,
    pub starts_on: NaiveDate,
    pub deadline_on: Option<NaiveDate>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. The phase always starts at
/// `client_acquisition`; `created_by` comes from the acting user, not the
/// payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub client_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Defaults to 2 (medium) if omitted.
    pub priority: Option<StatusId>,
    /// Defaults to today if omitted.
    pub starts_on: Option<NaiveDate>,
    pub deadline_on: Option<NaiveDate>,
}

/// DTO for updating an existing project. All fields are optional; the
/// current phase is deliberately absent -- phase changes go through the
/// lifecycle engine only.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<StatusId>,
    pub starts_on: Option<NaiveDate>,
    pub deadline_on: Option<NaiveDate>,
}
