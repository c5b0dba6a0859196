//! Caller identity as supplied by the external credential service.

use crate::types::DbId;

/// The acting user behind an engine operation.
///
/// Produced by the credential service after token verification; the engine
/// never derives or re-checks identity itself. `is_admin` is a global flag
/// and grants no project-scoped role -- project access always goes through
/// the permission resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: DbId,
    pub is_admin: bool,
}

impl Identity {
    pub fn new(user_id: DbId, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }
}
