//! Route definitions for the todo resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::todos;
use crate::state::AppState;

/// Todo routes mounted at `/todos`.
///
/// ```text
/// GET    /        -> list_todos
/// POST   /        -> create_todo
/// GET    /{id}    -> get_todo
/// PATCH  /{id}    -> update_todo
/// DELETE /{id}    -> delete_todo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/{id}",
            get(todos::get_todo)
                .patch(todos::update_todo)
                .delete(todos::delete_todo),
        )
}
