//! Appends to the activity ledger.
//!
//! Mutating operations append *inside* their own transaction via
//! [`AuditRecorder::record_in_tx`], so a committed mutation can never lose
//! its ledger entry to a crash between commit and append. Permission
//! denials have no transaction open and append best-effort through the
//! pool.

use atelier_db::models::activity::CreateActivityLog;
use atelier_db::repositories::ActivityLogRepo;
use sqlx::{PgConnection, PgPool};

/// Appends activity entries on behalf of engine operations.
pub struct AuditRecorder;

impl AuditRecorder {
    /// Append an entry through the pool, swallowing failures.
    ///
    /// The entry must never alter the primary operation's outcome, so a
    /// failed append is logged at WARN and dropped.
    pub async fn record(pool: &PgPool, entry: &CreateActivityLog) {
        if let Err(err) = ActivityLogRepo::insert(pool, entry).await {
            tracing::warn!(
                error = %err,
                action = %entry.action,
                "Failed to append activity entry"
            );
        }
    }

    /// Append an entry inside the caller's transaction so the entry and the
    /// mutation it describes commit or roll back together.
    pub async fn record_in_tx(
        conn: &mut PgConnection,
        entry: &CreateActivityLog,
    ) -> Result<(), sqlx::Error> {
        ActivityLogRepo::insert_in_tx(conn, entry).await?;
        Ok(())
    }
}
