//! The project lifecycle and access control engine.
//!
//! Every mutating operation runs inside a single storage transaction that
//! locks the rows it reads before validating, then commits or rolls back as
//! a unit -- partial application of a cascade or of phase provisioning is a
//! correctness bug, not a degraded mode. Callers are stateless workers
//! sharing nothing but the connection pool; all durable invariants live in
//! the backing store.
//!
//! Bulk operations are the one deliberate exception: admission is
//! all-or-nothing, but the mutation phase is a sequence of independent
//! single-task transactions so one conflicting task cannot block the rest
//! of the batch.

pub mod admin;
pub mod audit;
pub mod bulk;
pub mod deletion;
pub mod error;
pub mod permission;
pub mod phase;
pub mod task_status;
pub mod team;

pub use error::{EngineError, EngineResult};
