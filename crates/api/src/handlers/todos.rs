//! Handlers for the todo resource.
//!
//! Input is validated before the store is touched; store errors are
//! classified by [`AppError`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use todos_core::error::CoreError;
use todos_core::read_plan::ReadPlan;
use todos_core::todo::ENTITY_TODO;
use todos_core::types::DbId;
use todos_db::models::todo::{CreateTodo, UpdateTodo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery, TodoIdPath};
use crate::query::ListTodosQuery;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: ENTITY_TODO,
        id,
    })
}

/// GET /api/todos
///
/// List todos with optional `q`, `completed`, `priority`, `sortBy` and
/// `sortOrder` parameters.
pub async fn list_todos(
    State(state): State<AppState>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    let query = ListTodosQuery::from_pairs(pairs);
    let plan = ReadPlan::resolve(&query.as_params(), state.config.query_param_mode)?;
    let todos = state.store.list(&plan).await?;

    tracing::debug!(
        count = todos.len(),
        sort_by = plan.sort_by.as_str(),
        sort_order = plan.sort_order.as_str(),
        "Todos listed",
    );

    Ok(Json(DataResponse::new(todos, "Todos retrieved successfully")))
}

/// GET /api/todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    TodoIdPath(todo_id): TodoIdPath,
) -> AppResult<impl IntoResponse> {
    let todo = state
        .store
        .find_by_id(todo_id)
        .await?
        .ok_or_else(|| not_found(todo_id))?;

    Ok(Json(DataResponse::new(todo, "Todo retrieved successfully")))
}

/// POST /api/todos
///
/// Create a todo. New todos always start incomplete.
pub async fn create_todo(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTodo>,
) -> AppResult<impl IntoResponse> {
    let new_todo = input.validate_create()?;
    let todo = state.store.create(&new_todo).await?;

    tracing::info!(
        todo_id = todo.id,
        priority = %todo.priority,
        "Todo created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(todo, "Todo created successfully")),
    ))
}

/// PATCH /api/todos/{id}
///
/// Partially update a todo. An empty body only refreshes `updatedAt`.
pub async fn update_todo(
    State(state): State<AppState>,
    TodoIdPath(todo_id): TodoIdPath,
    AppJson(input): AppJson<UpdateTodo>,
) -> AppResult<impl IntoResponse> {
    let changes = input.validate_update()?;
    let todo = state
        .store
        .update(todo_id, &changes)
        .await?
        .ok_or_else(|| not_found(todo_id))?;

    tracing::info!(todo_id, no_op = changes.is_empty(), "Todo updated");

    Ok(Json(DataResponse::new(todo, "Todo updated successfully")))
}

/// DELETE /api/todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    TodoIdPath(todo_id): TodoIdPath,
) -> AppResult<impl IntoResponse> {
    let deleted = state.store.delete(todo_id).await?;

    if !deleted {
        return Err(not_found(todo_id));
    }

    tracing::info!(todo_id, "Todo deleted");

    Ok(Json(MessageResponse {
        message: "Todo deleted successfully",
    }))
}
