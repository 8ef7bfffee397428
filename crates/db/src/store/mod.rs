//! The persistence seam used by the HTTP layer.
//!
//! Handlers hold a [`SharedTodoStore`] built once at startup and never reach
//! for a global client. [`PgTodoStore`] is the production implementation;
//! [`MemoryTodoStore`] applies the same filter and sort rules in-process and
//! backs local development without a database and the HTTP test suite.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use todos_core::read_plan::ReadPlan;
use todos_core::todo::{NewTodo, TodoChanges};
use todos_core::types::DbId;

use crate::models::todo::Todo;

pub use memory::MemoryTodoStore;
pub use postgres::PgTodoStore;

/// CRUD operations over todos.
///
/// Errors are reported as [`sqlx::Error`] so the HTTP layer classifies every
/// backend the same way. Lookups that miss return `None` / `false` rather
/// than an error.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Todos matching `plan`, in its order.
    async fn list(&self, plan: &ReadPlan) -> Result<Vec<Todo>, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error>;

    async fn create(&self, input: &NewTodo) -> Result<Todo, sqlx::Error>;

    /// Apply `changes`; `updated_at` is refreshed even when `changes` is empty.
    async fn update(&self, id: DbId, changes: &TodoChanges) -> Result<Option<Todo>, sqlx::Error>;

    /// Returns `true` if a todo was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

/// Cheaply cloneable handle to the configured store.
pub type SharedTodoStore = Arc<dyn TodoStore>;
