//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Methods that must run inside a
//! caller-owned transaction (row locks, cascades, in-transaction ledger
//! appends) accept `&mut PgConnection` instead.

pub mod activity_repo;
pub mod client_repo;
pub mod file_repo;
pub mod member_repo;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

pub use activity_repo::ActivityLogRepo;
pub use client_repo::ClientRepo;
pub use file_repo::FileRepo;
pub use member_repo::MemberRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
