use atelier_core::error::CoreError;

/// Engine-level error type.
///
/// Domain failures (not found, invalid transition, forbidden) stay typed as
/// [`CoreError`] so callers can match on them; storage faults surface as a
/// distinct variant after the transaction has rolled back. The engine never
/// retries storage faults -- retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `atelier-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backing store failed or the transaction could not complete.
    #[error("Storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Convenience type alias for engine operation results.
pub type EngineResult<T> = Result<T, EngineError>;
