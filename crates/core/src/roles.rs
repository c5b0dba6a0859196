//! Project-scoped roles and the static permission matrix.
//!
//! A caller's effective role on a project comes from exactly two sources:
//! project ownership (`created_by`) or an active membership row, with
//! ownership always taking precedence. Membership role labels are free text
//! at the storage layer for backward compatibility; [`normalize_role_label`]
//! maps them into the closed set before any permission decision.

use serde::{Deserialize, Serialize};

/// Effective role of a user on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Owner,
    Manager,
    Member,
    Viewer,
}

/// A project-scoped action subject to the permission matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    View,
    Update,
    Delete,
    ManageTeam,
    WriteTask,
    WriteFile,
}

impl ProjectRole {
    /// The snake_case label used in audit entries.
    pub fn label(self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::Manager => "manager",
            ProjectRole::Member => "member",
            ProjectRole::Viewer => "viewer",
        }
    }

    /// Static permission matrix lookup. Not overridable at runtime.
    ///
    /// | Role    | view | update | delete | manage-team | write-task | write-file |
    /// |---------|------|--------|--------|-------------|------------|------------|
    /// | owner   | yes  | yes    | yes    | yes         | yes        | yes        |
    /// | manager | yes  | yes    | --     | yes         | yes        | yes        |
    /// | member  | yes  | --     | --     | --          | yes        | yes        |
    /// | viewer  | yes  | --     | --     | --          | --         | --         |
    pub fn allows(self, permission: Permission) -> bool {
        use Permission::{Delete, View, WriteFile, WriteTask};
        match self {
            ProjectRole::Owner => true,
            ProjectRole::Manager => !matches!(permission, Delete),
            ProjectRole::Member => matches!(permission, View | WriteTask | WriteFile),
            ProjectRole::Viewer => matches!(permission, View),
        }
    }
}

impl Permission {
    /// The snake_case label used in audit entries and denial messages.
    pub fn label(self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Update => "update",
            Permission::Delete => "delete",
            Permission::ManageTeam => "manage_team",
            Permission::WriteTask => "write_task",
            Permission::WriteFile => "write_file",
        }
    }
}

/// Normalize a stored membership role label into the closed role set.
///
/// Matching is trim + ASCII-lowercase. Any label outside
/// {manager, member, viewer} maps to `Member`, the least-privileged
/// non-owner writing role, so legacy labels keep working. `Owner` is never
/// produced from a label -- ownership comes from `created_by` only.
pub fn normalize_role_label(label: &str) -> ProjectRole {
    match label.trim().to_ascii_lowercase().as_str() {
        "manager" => ProjectRole::Manager,
        "viewer" => ProjectRole::Viewer,
        _ => ProjectRole::Member,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Permission matrix
    // -----------------------------------------------------------------------

    const ALL_PERMISSIONS: [Permission; 6] = [
        Permission::View,
        Permission::Update,
        Permission::Delete,
        Permission::ManageTeam,
        Permission::WriteTask,
        Permission::WriteFile,
    ];

    #[test]
    fn owner_holds_every_permission() {
        for permission in ALL_PERMISSIONS {
            assert!(ProjectRole::Owner.allows(permission));
        }
    }

    #[test]
    fn manager_holds_everything_except_delete() {
        assert!(ProjectRole::Manager.allows(Permission::View));
        assert!(ProjectRole::Manager.allows(Permission::Update));
        assert!(ProjectRole::Manager.allows(Permission::ManageTeam));
        assert!(ProjectRole::Manager.allows(Permission::WriteTask));
        assert!(ProjectRole::Manager.allows(Permission::WriteFile));
        assert!(!ProjectRole::Manager.allows(Permission::Delete));
    }

    #[test]
    fn member_can_view_and_write_content_only() {
        assert!(ProjectRole::Member.allows(Permission::View));
        assert!(ProjectRole::Member.allows(Permission::WriteTask));
        assert!(ProjectRole::Member.allows(Permission::WriteFile));
        assert!(!ProjectRole::Member.allows(Permission::Update));
        assert!(!ProjectRole::Member.allows(Permission::Delete));
        assert!(!ProjectRole::Member.allows(Permission::ManageTeam));
    }

    #[test]
    fn viewer_is_read_only() {
        assert!(ProjectRole::Viewer.allows(Permission::View));
        for permission in ALL_PERMISSIONS {
            if permission != Permission::View {
                assert!(
                    !ProjectRole::Viewer.allows(permission),
                    "viewer should be denied {}",
                    permission.label()
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Role label normalization
    // -----------------------------------------------------------------------

    #[test]
    fn known_labels_map_to_their_roles() {
        assert_eq!(normalize_role_label("manager"), ProjectRole::Manager);
        assert_eq!(normalize_role_label("member"), ProjectRole::Member);
        assert_eq!(normalize_role_label("viewer"), ProjectRole::Viewer);
    }

    #[test]
    fn labels_match_case_insensitively() {
        assert_eq!(normalize_role_label("Manager"), ProjectRole::Manager);
        assert_eq!(normalize_role_label("VIEWER"), ProjectRole::Viewer);
    }

    #[test]
    fn labels_are_trimmed_before_matching() {
        assert_eq!(normalize_role_label("  manager "), ProjectRole::Manager);
    }

    #[test]
    fn unknown_labels_fall_back_to_member() {
        assert_eq!(normalize_role_label("contributor"), ProjectRole::Member);
        assert_eq!(normalize_role_label("editor"), ProjectRole::Member);
        assert_eq!(normalize_role_label(""), ProjectRole::Member);
    }

    #[test]
    fn owner_is_never_produced_from_a_label() {
        assert_eq!(normalize_role_label("owner"), ProjectRole::Member);
    }

    // -----------------------------------------------------------------------
    // Labels
    // -----------------------------------------------------------------------

    #[test]
    fn role_labels_are_snake_case() {
        assert_eq!(ProjectRole::Owner.label(), "owner");
        assert_eq!(ProjectRole::Manager.label(), "manager");
    }

    #[test]
    fn permission_labels_are_snake_case() {
        assert_eq!(Permission::ManageTeam.label(), "manage_team");
        assert_eq!(Permission::WriteTask.label(), "write_task");
    }
}
