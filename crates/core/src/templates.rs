//! Phase-default task templates.
//!
//! When a project advances into a phase, the engine provisions one pending
//! task per template title that is not already present among that project's
//! tasks for the phase. Title comparison goes through [`normalize_title`] so
//! re-provisioning never duplicates a task whose title differs only in case
//! or whitespace.

use crate::status::ProjectPhase;

/// The fixed template task titles for each phase.
pub fn template_titles(phase: ProjectPhase) -> &'static [&'static str] {
    match phase {
        ProjectPhase::ClientAcquisition => &[
            "Initial client consultation",
            "Collect client brief",
            "Prepare proposal",
        ],
        ProjectPhase::StrategyPlanning => &[
            "Define project scope",
            "Draft timeline and milestones",
            "Assign team roles",
        ],
        ProjectPhase::Production => &["Kick off production", "First internal review"],
        ProjectPhase::PostProduction => &[
            "Editing pass",
            "Client review round",
            "Apply revision feedback",
        ],
        ProjectPhase::Delivery => &[
            "Final quality check",
            "Deliver final assets",
            "Collect client sign-off",
        ],
    }
}

/// Normalize a task title for duplicate detection: ASCII-lowercase with
/// runs of whitespace collapsed to single spaces and outer whitespace
/// removed.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
