use async_trait::async_trait;
use todos_core::read_plan::ReadPlan;
use todos_core::todo::{NewTodo, TodoChanges};
use todos_core::types::DbId;

use super::TodoStore;
use crate::models::todo::Todo;
use crate::repositories::TodoRepo;
use crate::DbPool;

/// [`TodoStore`] backed by a PostgreSQL pool. Each call borrows one pooled
/// connection for a single statement.
#[derive(Clone)]
pub struct PgTodoStore {
    pool: DbPool,
}

impl PgTodoStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self, plan: &ReadPlan) -> Result<Vec<Todo>, sqlx::Error> {
        TodoRepo::list(&self.pool, plan).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        TodoRepo::find_by_id(&self.pool, id).await
    }

    async fn create(&self, input: &NewTodo) -> Result<Todo, sqlx::Error> {
        TodoRepo::create(&self.pool, input).await
    }

    async fn update(&self, id: DbId, changes: &TodoChanges) -> Result<Option<Todo>, sqlx::Error> {
        TodoRepo::update(&self.pool, id, changes).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        TodoRepo::delete(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
