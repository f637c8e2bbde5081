/// Todo endpoints
///
/// All routes require a session (see `app::session_auth_layer`).
///
/// - `GET /todos` - List the caller's todos
/// - `POST /todos` - Create a todo
/// - `GET /todos/:id` - Fetch one todo
/// - `PATCH /todos/:id` - Replace a todo's content
/// - `DELETE /todos/:id` - Delete a todo
///
/// # Ownership
///
/// Single-item routes load the todo through
/// [`AuthorizationGuard`](todo_shared::auth::authorization::AuthorizationGuard).
/// A todo owned by someone else answers 404 exactly like a missing one, and
/// so does an `:id` that is not a number.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::DataResponse,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use todo_shared::{auth::middleware::AuthContext, models::task::Task};
use validator::Validate;

/// Create / update request body
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoRequest {
    /// New content
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

fn parse_todo_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>().map_err(|_| ApiError::todo_not_found())
}

/// List the caller's todos
///
/// Returns `{ "data": [] }` when the caller has none.
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DataResponse<Vec<Task>>>> {
    let todos = state.tasks.list_tasks(auth.user_id()).await?;

    tracing::debug!(user_id = auth.user_id(), count = todos.len(), "Listed todos");

    Ok(Json(DataResponse::new(todos)))
}

/// Create a todo owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `422 Unprocessable Entity`: Content empty or too long
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    req.validate()?;

    let task = state.tasks.create_task(auth.user_id(), &req.content).await?;

    tracing::info!(user_id = auth.user_id(), task_id = task.id, "Todo created");

    Ok(StatusCode::NO_CONTENT)
}

/// Fetch one of the caller's todos
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Task>>> {
    let id = parse_todo_id(&id)?;
    let task = state.guard.authorize_item(&auth.user, id).await?;

    Ok(Json(DataResponse::new(task)))
}

/// Replace the content of one of the caller's todos
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = parse_todo_id(&id)?;
    let Json(req) = payload?;
    req.validate()?;

    let mut task = state.guard.authorize_item(&auth.user, id).await?;
    task.content = req.content;
    state.tasks.update_task(&task).await?;

    tracing::info!(user_id = auth.user_id(), task_id = task.id, "Todo updated");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete one of the caller's todos
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_todo_id(&id)?;
    let task = state.guard.authorize_item(&auth.user, id).await?;
    state.tasks.delete_task(&task).await?;

    tracing::info!(user_id = auth.user_id(), task_id = task.id, "Todo deleted");

    Ok(StatusCode::NO_CONTENT)
}
