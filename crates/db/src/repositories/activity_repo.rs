//! Repository for the `activity_logs` table.
//!
//! The ledger is append-only: there are insert and read methods, nothing
//! else. Mutating engine operations append inside their own transaction via
//! [`ActivityLogRepo::insert_in_tx`]; permission denials append best-effort
//! through the pool.

use atelier_core::types::Timestamp;
use sqlx::{PgConnection, PgPool};

use crate::models::activity::{ActivityLog, ActivityQuery, CreateActivityLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, occurred_at, user_id, action, project_id, entity_type, \
    entity_id, details";

/// Maximum page size for ledger queries.
const MAX_LIMIT: i64 = 500;

/// Default page size for ledger queries.
const DEFAULT_LIMIT: i64 = 50;

/// Provides append and query operations for the activity ledger.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append an entry, returning the created row.
    pub async fn insert(
        pool: &PgPool,
        entry: &CreateActivityLog,
    ) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs
                (user_id, action, project_id, entity_type, entity_id, details)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(entry.project_id)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.details)
            .fetch_one(pool)
            .await
    }

    /// Append an entry inside a caller-owned transaction, so the entry
    /// commits or rolls back together with the mutation it describes.
    pub async fn insert_in_tx(
        conn: &mut PgConnection,
        entry: &CreateActivityLog,
    ) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs
                (user_id, action, project_id, entity_type, entity_id, details)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entry.user_id)
            .bind(&entry.action)
            .bind(entry.project_id)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.details)
            .fetch_one(&mut *conn)
            .await
    }

    /// Query ledger entries with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &ActivityQuery,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let (where_clause, bind_values, bind_idx) = build_activity_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs {where_clause}
             ORDER BY occurred_at DESC, id DESC
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_activity_values(sqlx::query_as::<_, ActivityLog>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count ledger entries matching the given filter (for pagination
    /// metadata).
    pub async fn count(pool: &PgPool, params: &ActivityQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_activity_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT FROM activity_logs {where_clause}");

        let q = bind_activity_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built ledger queries.
enum BindValue {
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from `ActivityQuery` filter
/// parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The
/// `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_activity_filter(params: &ActivityQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.user_id {
        conditions.push(format!("user_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(user_id));
    }

    if let Some(project_id) = params.project_id {
        conditions.push(format!("project_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(project_id));
    }

    if let Some(ref action) = params.action {
        conditions.push(format!("action = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(action.clone()));
    }

    if let Some(after) = params.occurred_after {
        conditions.push(format!("occurred_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(after));
    }

    if let Some(before) = params.occurred_before {
        conditions.push(format!("occurred_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(before));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_activity_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_activity_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
