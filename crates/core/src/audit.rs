//! Well-known activity-ledger action names.
//!
//! This module lives in `core` (zero internal deps) so the engine, the
//! repository layer, and any future worker or CLI tooling agree on the
//! exact action strings written to the `activity_logs` table.

/// Known action names for activity entries.
pub mod actions {
    pub const TASK_STATUS_CHANGED: &str = "task_status_changed";
    pub const TASK_DELETED: &str = "task_deleted";
    pub const PHASE_ADVANCED: &str = "phase_advanced";
    pub const PROJECT_DELETED: &str = "project_deleted";
    pub const MEMBER_UPSERTED: &str = "member_upserted";
    pub const MEMBER_REMOVED: &str = "member_removed";
    pub const USER_DEACTIVATED: &str = "user_deactivated";
    pub const USER_REACTIVATED: &str = "user_reactivated";
    pub const AUTHZ_DENIED: &str = "authz_denied";
}

/// Entity type tags stored alongside entity ids in activity entries.
pub mod entity_types {
    pub const PROJECT: &str = "project";
    pub const TASK: &str = "task";
    pub const USER: &str = "user";
    pub const MEMBER: &str = "member";
}

/// All mutation actions (everything except denials).
pub const MUTATION_ACTIONS: &[&str] = &[
    actions::TASK_STATUS_CHANGED,
    actions::TASK_DELETED,
    actions::PHASE_ADVANCED,
    actions::PROJECT_DELETED,
    actions::MEMBER_UPSERTED,
    actions::MEMBER_REMOVED,
    actions::USER_DEACTIVATED,
    actions::USER_REACTIVATED,
];

/// Returns `true` for actions that record a committed state mutation, as
/// opposed to a permission denial.
pub fn is_mutation_action(action: &str) -> bool {
    MUTATION_ACTIONS.contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_is_not_a_mutation_action() {
        assert!(!is_mutation_action(actions::AUTHZ_DENIED));
    }

    #[test]
    fn state_changes_are_mutation_actions() {
        assert!(is_mutation_action(actions::TASK_STATUS_CHANGED));
        assert!(is_mutation_action(actions::PHASE_ADVANCED));
        assert!(is_mutation_action(actions::PROJECT_DELETED));
    }

    #[test]
    fn unknown_actions_are_not_mutations() {
        assert!(!is_mutation_action("login"));
    }
}
