//! Project phase advancement with template-task provisioning.

use std::collections::HashSet;

use atelier_core::audit::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::status::ProjectPhase;
use atelier_core::templates::{normalize_title, template_titles};
use atelier_core::types::DbId;
use atelier_db::models::activity::CreateActivityLog;
use atelier_db::models::project::Project;
use atelier_db::repositories::{ProjectRepo, TaskRepo};
use sqlx::PgPool;

use crate::audit::AuditRecorder;
use crate::error::EngineResult;

/// Advances projects through the fixed five-phase lifecycle.
pub struct PhaseService;

impl PhaseService {
    /// Advance a project to `next_phase`, which must be exactly the phase
    /// following its current one -- no skips, no regressions, no staying in
    /// place.
    ///
    /// Within the same transaction, every template title of the destination
    /// phase that is not already present (case/whitespace-insensitively)
    /// among the project's live tasks for that phase is provisioned as a
    /// pending, unassigned task attributed to `acting_user_id`. Because
    /// existing titles are always checked first, replaying a transition
    /// attempt can never duplicate template tasks.
    ///
    /// `reason` is operator context only -- free text, never validated.
    pub async fn advance(
        pool: &PgPool,
        project_id: DbId,
        next_phase: ProjectPhase,
        acting_user_id: DbId,
        reason: Option<&str>,
    ) -> EngineResult<Project> {
        let mut tx = pool.begin().await?;

        let project = ProjectRepo::find_by_id_for_update(&mut *tx, project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;

        let current = ProjectPhase::from_id(project.current_phase).ok_or_else(|| {
            CoreError::Internal(format!(
                "project {project_id} has unknown phase id {}",
                project.current_phase
            ))
        })?;
        current.validate_advance(next_phase)?;

        let updated = ProjectRepo::set_phase(&mut *tx, project_id, next_phase).await?;

        let existing: HashSet<String> = TaskRepo::titles_in_phase(&mut *tx, project_id, next_phase)
            .await?
            .iter()
            .map(|title| normalize_title(title))
            .collect();
        let mut provisioned = 0u32;
        for title in template_titles(next_phase) {
            if !existing.contains(&normalize_title(title)) {
                TaskRepo::insert_template(&mut *tx, project_id, next_phase, title, acting_user_id)
                    .await?;
                provisioned += 1;
            }
        }

        AuditRecorder::record_in_tx(
            &mut *tx,
            &CreateActivityLog {
                user_id: Some(acting_user_id),
                action: actions::PHASE_ADVANCED.to_string(),
                project_id: Some(project_id),
                entity_type: Some(entity_types::PROJECT.to_string()),
                entity_id: Some(project_id),
                details: serde_json::json!({
                    "from": current.label(),
                    "to": next_phase.label(),
                    "reason": reason,
                }),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(
            project_id,
            from = current.label(),
            to = next_phase.label(),
            provisioned,
            "Project phase advanced"
        );
        Ok(updated)
    }
}
