use std::sync::Arc;

use todos_db::store::SharedTodoStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence for todos, built once at startup.
    pub store: SharedTodoStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
