/// Task endpoints
///
/// All routes here sit behind the access control gate, so handlers always
/// have an `AuthContext`. Ownership and role checks happen here, against the
/// concrete task — they need the resource, so they are not middleware.
///
/// # Endpoints
///
/// - `GET    /api/v1/tasks` - List tasks (admin: all with owner joined; user: own)
/// - `POST   /api/v1/tasks` - Create a task (owner = caller, always)
/// - `PUT    /api/v1/tasks/:id` - Update (owner or admin)
/// - `DELETE /api/v1/tasks/:id` - Delete (owner or admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskStatus, TaskWithOwner, UpdateTask},
};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Rejects titles that are empty or whitespace-only
fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("non_blank"));
    }
    Ok(())
}

/// Create task request
///
/// There is deliberately no owner field: the owner is always the caller, and
/// a caller-supplied owner is not even representable.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title, required and non-blank
    #[validate(custom(function = non_blank, message = "Title is required"))]
    pub title: String,

    /// Optional description, defaults to empty
    pub description: Option<String>,

    /// Optional initial status, defaults to pending; an out-of-enum value is
    /// rejected at deserialization
    pub status: Option<TaskStatus>,
}

/// Update task request — only present fields change
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title, non-blank when present
    #[validate(custom(function = non_blank, message = "Title cannot be empty"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,
}

/// Task list body
///
/// Admins get every task with owner fields joined in; everyone else gets
/// exactly their own tasks. The two shapes serialize transparently.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TaskList {
    /// Caller's own tasks
    Owned(Vec<Task>),

    /// All tasks with owner joined (admin view)
    All(Vec<TaskWithOwner>),
}

/// Response wrapper for task listings
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    /// The listed tasks
    pub tasks: TaskList,
}

/// Response wrapper for a single task
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// The task
    pub task: Task,
}

/// Checks the owner-or-admin write rule for a task
///
/// 404 on a missing id is decided before this runs, so probing a missing id
/// and probing someone else's task give different answers (404 vs 403) by
/// design.
fn ensure_can_modify(auth: &AuthContext, task: &Task, action: &str) -> Result<(), ApiError> {
    let is_owner = task.created_by == auth.user_id;
    if !is_owner && !auth.is_admin() {
        return Err(ApiError::Forbidden(format!(
            "Not allowed to {} this task",
            action
        )));
    }
    Ok(())
}

/// List tasks
///
/// Admin callers see all tasks with owner name/email/role joined in;
/// non-admin callers see exactly the tasks they own.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TasksResponse>> {
    let tasks = if auth.is_admin() {
        TaskList::All(Task::list_all_with_owner(&state.db).await?)
    } else {
        TaskList::Owned(Task::list_by_owner(&state.db, auth.user_id).await?)
    };

    Ok(Json(TasksResponse { tasks }))
}

/// Create a task
///
/// The owner is always the authenticated caller.
///
/// # Errors
///
/// - `400 Bad Request`: Title missing or blank, or unknown status value
/// - `500 Internal Server Error`: Store failure
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    WithRejection(Json(req), _): WithRejection<Json<CreateTaskRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate().map_err(ApiError::from)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description.unwrap_or_default(),
            status: req.status.unwrap_or_default(),
            created_by: auth.user_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

/// Update a task
///
/// Allowed iff the caller owns the task or is an admin.
///
/// # Errors
///
/// - `400 Bad Request`: Blank title or unknown status value
/// - `403 Forbidden`: Caller is neither owner nor admin
/// - `404 Not Found`: No task with this id
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateTaskRequest>, ApiError>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate().map_err(ApiError::from)?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    ensure_can_modify(&auth, &task, "update")?;

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse { task }))
}

/// Delete a task
///
/// Allowed iff the caller owns the task or is an admin.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither owner nor admin
/// - `404 Not Found`: No task with this id
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    ensure_can_modify(&auth, &task, "delete")?;

    Task::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Task deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tasktrack_shared::models::user::Role;

    fn task_owned_by(owner: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            created_by: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_can_modify() {
        let owner = Uuid::new_v4();
        let auth = AuthContext {
            user_id: owner,
            role: Role::User,
        };

        assert!(ensure_can_modify(&auth, &task_owned_by(owner), "update").is_ok());
    }

    #[test]
    fn test_admin_can_modify_any_task() {
        let auth = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };

        assert!(ensure_can_modify(&auth, &task_owned_by(Uuid::new_v4()), "delete").is_ok());
    }

    #[test]
    fn test_non_owner_non_admin_is_forbidden() {
        let auth = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::User,
        };

        let result = ensure_can_modify(&auth, &task_owned_by(Uuid::new_v4()), "update");
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_blank_title_fails_validation() {
        let req = CreateTaskRequest {
            title: "   ".to_string(),
            description: None,
            status: None,
        };
        assert!(req.validate().is_err());

        let req = CreateTaskRequest {
            title: "Buy milk".to_string(),
            description: None,
            status: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_title_optional_but_non_blank() {
        let req = UpdateTaskRequest::default();
        assert!(req.validate().is_ok());

        let req = UpdateTaskRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
