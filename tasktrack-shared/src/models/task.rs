/// Task model and store operations
///
/// Tasks belong to exactly one user (`created_by`), set at creation and never
/// updated afterwards. Write access is decided in the handlers: owner or
/// admin.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in-progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'pending',
///     created_by UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::Role;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet (the default on creation)
    #[default]
    Pending,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Title, non-empty
    pub title: String,

    /// Free-form description, defaults to empty
    pub description: String,

    /// Lifecycle status
    pub status: TaskStatus,

    /// Owning user ID, immutable after creation
    pub created_by: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Owner fields joined into admin task listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOwner {
    /// Owning user ID
    pub id: Uuid,

    /// Owner display name
    pub name: String,

    /// Owner email
    pub email: String,

    /// Owner role
    pub role: Role,
}

/// Task with its owner joined in, for admin listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithOwner {
    /// Task ID
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Description
    pub description: String,

    /// Lifecycle status
    pub status: TaskStatus,

    /// Owner fields (name/email/role joined from users)
    pub created_by: TaskOwner,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Flat row shape for the task-owner join query
#[derive(Debug, sqlx::FromRow)]
struct TaskWithOwnerRow {
    id: Uuid,
    title: String,
    description: String,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_name: String,
    owner_email: String,
    owner_role: Role,
}

impl From<TaskWithOwnerRow> for TaskWithOwner {
    fn from(row: TaskWithOwnerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            created_by: TaskOwner {
                id: row.owner_id,
                name: row.owner_name,
                email: row.owner_email,
                role: row.owner_role,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a task
///
/// `created_by` is filled in by the handler from the authenticated identity;
/// it is never part of the request body.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Title, already validated non-empty
    pub title: String,

    /// Description (empty string when the client omits it)
    pub description: String,

    /// Initial status
    pub status: TaskStatus,

    /// Owning user — always the caller
    pub created_by: Uuid,
}

/// Input for updating a task — only present fields change
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, created_by, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_by, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists the tasks owned by one user, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_by, created_at, updated_at
            FROM tasks
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists all tasks with owner name/email/role joined in, newest first
    ///
    /// Admin-only view; the role gate has already run by the time this is
    /// called.
    pub async fn list_all_with_owner(pool: &PgPool) -> Result<Vec<TaskWithOwner>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskWithOwnerRow>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.created_at, t.updated_at,
                   u.id AS owner_id, u.name AS owner_name,
                   u.email AS owner_email, u.role AS owner_role
            FROM tasks t
            JOIN users u ON u.id = t.created_by
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskWithOwner::from).collect())
    }

    /// Updates a task; absent fields keep their current value
    ///
    /// `created_by` has no update path — ownership is immutable.
    ///
    /// # Returns
    ///
    /// The updated task, or None if the id does not exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// # Returns
    ///
    /// True if the task existed and was deleted
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_status_serde_round_trip() {
        let status: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let result: Result<TaskStatus, _> = serde_json::from_str("\"cancelled\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("createdBy").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_task_with_owner_nests_owner_fields() {
        let owner_id = Uuid::new_v4();
        let row = TaskWithOwnerRow {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: String::new(),
            status: TaskStatus::Done,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            owner_id,
            owner_name: "Alice".to_string(),
            owner_email: "alice@example.com".to_string(),
            owner_role: Role::User,
        };

        let task = TaskWithOwner::from(row);
        assert_eq!(task.created_by.id, owner_id);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdBy"]["email"], "alice@example.com");
        assert_eq!(json["createdBy"]["role"], "user");
    }
}
