//! Activity ledger models and query DTOs.

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An append-only row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub occurred_at: Timestamp,
    pub user_id: Option<DbId>,
    pub action: String,
    pub project_id: Option<DbId>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
}

/// DTO for appending an activity entry.
#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub user_id: Option<DbId>,
    pub action: String,
    pub project_id: Option<DbId>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
}

/// Filter and pagination parameters for ledger queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    pub user_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub action: Option<String>,
    pub occurred_after: Option<Timestamp>,
    pub occurred_before: Option<Timestamp>,
    /// Defaults to 50, capped at 500.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
