/// Admin endpoints
///
/// All routes here sit behind both the access control gate and the admin
/// role gate — handlers never see a non-admin request.
///
/// # Endpoints
///
/// - `GET    /api/v1/admin/users` - List all users (credentials excluded)
/// - `DELETE /api/v1/admin/users/:id` - Delete a user and their tasks
/// - `GET    /api/v1/admin/tasks` - List all tasks with owner joined

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::{
        task::{Task, TaskWithOwner},
        user::{User, UserPublic},
    },
};
use uuid::Uuid;

/// User listing body
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    /// All users, password hashes excluded at the type level
    pub users: Vec<UserPublic>,
}

/// Admin task listing body
#[derive(Debug, Serialize)]
pub struct AdminTasksResponse {
    /// All tasks with owner name/email/role joined in
    pub tasks: Vec<TaskWithOwner>,
}

/// List all users
///
/// The projection type has no password field, so the credential cannot leak.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = User::list_public(&state.db).await?;

    Ok(Json(UsersResponse { users }))
}

/// Delete a user and everything they own
///
/// Self-delete is rejected before any state changes. The cascade deletes the
/// user's tasks first, then the user row, inside one transaction.
///
/// # Errors
///
/// - `400 Bad Request`: Admin tried to delete themself
/// - `404 Not Found`: No user with this id
/// - `500 Internal Server Error`: Store failure
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.id == auth.user_id {
        return Err(ApiError::BadRequest("Cannot delete yourself".to_string()));
    }

    User::delete_cascading(&state.db, user.id).await?;

    Ok(Json(MessageResponse::new("User and their tasks deleted")))
}

/// List all tasks with owner fields joined
pub async fn list_all_tasks(State(state): State<AppState>) -> ApiResult<Json<AdminTasksResponse>> {
    let tasks = Task::list_all_with_owner(&state.db).await?;

    Ok(Json(AdminTasksResponse { tasks }))
}
