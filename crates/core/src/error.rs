use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A state-machine edge that is not permitted. Always names the rejected
    /// edge so callers can distinguish a business-rule rejection from a bug.
    #[error("Invalid transition: {from} -> {to} is not allowed")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
