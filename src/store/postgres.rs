//! Postgres record store backed by a sqlx connection pool.
//!
//! Schema lives in `migrations/`. Enumerations are stored as text and
//! parsed on the way out; everything else maps directly.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::config;
use crate::models::{Project, Task, User};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connection_timeout))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }
}

fn task_from_row(row: &PgRow) -> Result<Task, StoreError> {
    let status: String = row.try_get("status")?;
    let priority: String = row.try_get("priority")?;
    Ok(Task {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: status.parse().map_err(StoreError::Decode)?,
        priority: priority.parse().map_err(StoreError::Decode)?,
        start_date: row.try_get("start_date")?,
        due_date: row.try_get("due_date")?,
        assigned_to: row.try_get("assigned_to")?,
        project: row.try_get("project")?,
    })
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, is_superuser FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_projects(&self, owner: Uuid) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, start_date, end_date, created_by \
             FROM projects WHERE created_by = $1 ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn create_project(&self, project: Project) -> Result<Project, StoreError> {
        sqlx::query(
            "INSERT INTO projects (id, name, description, start_date, end_date, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.created_by)
        .execute(&self.pool)
        .await?;
        Ok(project)
    }

    async fn project_by_id(&self, id: Uuid, owner: Uuid) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, start_date, end_date, created_by \
             FROM projects WHERE id = $1 AND created_by = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn project_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 AS one FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn update_project(&self, project: Project) -> Result<Project, StoreError> {
        sqlx::query(
            "UPDATE projects SET name = $2, description = $3, start_date = $4, end_date = $5 \
             WHERE id = $1",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .execute(&self.pool)
        .await?;
        Ok(project)
    }

    async fn delete_project(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self, assignee: Uuid) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, title, description, status, priority, start_date, due_date, \
                    assigned_to, project \
             FROM tasks WHERE assigned_to = $1 ORDER BY id",
        )
        .bind(assignee)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn tasks_in_project(&self, project: Uuid) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, title, description, status, priority, start_date, due_date, \
                    assigned_to, project \
             FROM tasks WHERE project = $1 ORDER BY id",
        )
        .bind(project)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn create_task(&self, task: Task) -> Result<Task, StoreError> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, status, priority, start_date, due_date, \
                                assigned_to, project) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.to_string())
        .bind(task.priority.to_string())
        .bind(task.start_date)
        .bind(task.due_date)
        .bind(task.assigned_to)
        .bind(task.project)
        .execute(&self.pool)
        .await?;
        Ok(task)
    }

    async fn task_by_id(&self, id: Uuid, assignee: Uuid) -> Result<Option<Task>, StoreError> {
        let row = sqlx::query(
            "SELECT id, title, description, status, priority, start_date, due_date, \
                    assigned_to, project \
             FROM tasks WHERE id = $1 AND assigned_to = $2",
        )
        .bind(id)
        .bind(assignee)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(task_from_row).transpose()
    }

    async fn update_task(&self, task: Task) -> Result<Task, StoreError> {
        sqlx::query(
            "UPDATE tasks SET title = $2, description = $3, status = $4, priority = $5, \
                              start_date = $6, due_date = $7, project = $8 \
             WHERE id = $1",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.to_string())
        .bind(task.priority.to_string())
        .bind(task.start_date)
        .bind(task.due_date)
        .bind(task.project)
        .execute(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid, assignee: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND assigned_to = $2")
            .bind(id)
            .bind(assignee)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
