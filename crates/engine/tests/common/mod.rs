//! Shared fixtures for engine integration tests.
//!
//! Each `#[sqlx::test]` gets its own database, so fixture names only need
//! to be unique within a single test.

#![allow(dead_code)]

use atelier_core::status::TaskStatus;
use atelier_core::types::DbId;
use atelier_db::models::activity::ActivityQuery;
use atelier_db::models::client::CreateClient;
use atelier_db::models::member::UpsertMember;
use atelier_db::models::project::Project;
use atelier_db::models::project::CreateProject;
use atelier_db::models::task::{CreateTask, Task};
use atelier_db::models::user::{CreateUser, User};
use atelier_db::repositories::{
    ActivityLogRepo, ClientRepo, MemberRepo, ProjectRepo, TaskRepo, UserRepo,
};
use sqlx::PgPool;

/// Initialize test logging once; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub async fn seed_user(pool: &PgPool, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            is_admin: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_admin(pool: &PgPool, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            is_admin: Some(true),
        },
    )
    .await
    .unwrap()
}

/// Create a client plus a project owned by `owner_id`, in phase 1.
pub async fn seed_project(pool: &PgPool, owner_id: DbId) -> Project {
    let client = ClientRepo::create(
        pool,
        &CreateClient {
            name: "Fixture Client".to_string(),
            contact_email: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    ProjectRepo::create(
        pool,
        owner_id,
        &CreateProject {
            client_id: client.id,
            name: "Fixture Project".to_string(),
            description: None,
            priority: None,
            starts_on: None,
            deadline_on: None,
        },
    )
    .await
    .unwrap()
}

/// Create a pending task in phase 1.
pub async fn seed_task(pool: &PgPool, project_id: DbId, creator_id: DbId, title: &str) -> Task {
    TaskRepo::create(
        pool,
        creator_id,
        &CreateTask {
            project_id,
            title: title.to_string(),
            description: None,
            phase: 1,
            assignee_id: None,
            due_on: None,
        },
    )
    .await
    .unwrap()
}

pub async fn add_member(pool: &PgPool, project_id: DbId, user_id: DbId, role: &str) {
    MemberRepo::upsert(
        pool,
        project_id,
        &UpsertMember {
            user_id,
            role: role.to_string(),
        },
    )
    .await
    .unwrap();
}

/// Test scaffolding: force a task into an arbitrary status, keeping the
/// completed_at invariant intact.
pub async fn force_task_status(pool: &PgPool, task_id: DbId, status: TaskStatus) {
    sqlx::query(
        "UPDATE tasks SET status = $2,
            completed_at = CASE WHEN $3 THEN NOW() ELSE NULL END
         WHERE id = $1",
    )
    .bind(task_id)
    .bind(status.id())
    .bind(status == TaskStatus::Completed)
    .execute(pool)
    .await
    .unwrap();
}

/// Count ledger entries for an action, optionally scoped to a project.
pub async fn entry_count(pool: &PgPool, action: &str, project_id: Option<DbId>) -> i64 {
    ActivityLogRepo::count(
        pool,
        &ActivityQuery {
            action: Some(action.to_string()),
            project_id,
            ..Default::default()
        },
    )
    .await
    .unwrap()
}
