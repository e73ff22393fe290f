//! Record store abstraction.
//!
//! Handlers talk to storage through [`RecordStore`] only. Every id lookup is
//! fused with the ownership predicate, so a record owned by someone else is
//! indistinguishable from an absent one at this boundary.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Project, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Connection(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("corrupt stored record: {0}")]
    Decode(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    // Projects, always scoped by owner except the bare existence check
    // used to validate task references.
    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, StoreError>;
    async fn create_project(&self, project: Project) -> Result<Project, StoreError>;
    async fn project_by_id(&self, id: Uuid, owner: Uuid) -> Result<Option<Project>, StoreError>;
    async fn project_exists(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn update_project(&self, project: Project) -> Result<Project, StoreError>;
    /// Returns false when no record matched the id+owner pair.
    async fn delete_project(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;

    // Tasks, scoped by assignee.
    async fn list_tasks(&self, assignee: Uuid) -> Result<Vec<Task>, StoreError>;
    async fn tasks_in_project(&self, project: Uuid) -> Result<Vec<Task>, StoreError>;
    async fn create_task(&self, task: Task) -> Result<Task, StoreError>;
    async fn task_by_id(&self, id: Uuid, assignee: Uuid) -> Result<Option<Task>, StoreError>;
    async fn update_task(&self, task: Task) -> Result<Task, StoreError>;
    async fn delete_task(&self, id: Uuid, assignee: Uuid) -> Result<bool, StoreError>;
}
