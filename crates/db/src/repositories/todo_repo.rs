//! Repository for the `todos` table.

use sqlx::PgPool;
use todos_core::read_plan::{ReadPlan, SortField, SortOrder};
use todos_core::todo::{NewTodo, Priority, TodoChanges};
use todos_core::types::DbId;

use crate::models::todo::Todo;

/// Column list for `todos` queries.
const COLUMNS: &str = "id, title, description, priority, completed, created_at, updated_at";

/// Provides data access for todos.
pub struct TodoRepo;

impl TodoRepo {
    /// List todos matching the plan's filters, in the plan's order.
    ///
    /// Each filter is a nullable bind so absent filters drop out of the
    /// `WHERE` clause without changing the statement text.
    pub async fn list(pool: &PgPool, plan: &ReadPlan) -> Result<Vec<Todo>, sqlx::Error> {
        let order = order_clause(plan);
        let query = format!(
            "SELECT {COLUMNS} FROM todos \
             WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR description ILIKE $1) \
               AND ($2::BOOL IS NULL OR completed = $2) \
               AND ($3::TEXT IS NULL OR priority = $3) \
             ORDER BY {order}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(plan.text.as_deref().map(contains_pattern))
            .bind(plan.completed)
            .bind(plan.priority.map(Priority::as_str))
            .fetch_all(pool)
            .await
    }

    /// Find a todo by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new todo. `completed` and both timestamps take column defaults.
    pub async fn create(pool: &PgPool, input: &NewTodo) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, description, priority) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.priority.as_str())
            .fetch_one(pool)
            .await
    }

    /// Partially update a todo.
    ///
    /// Uses `COALESCE` so only provided fields are changed. `description`
    /// takes a "provided" flag so it can be cleared. `updated_at` always
    /// moves forward by at least one microsecond, even for an empty update.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let description_provided = changes.description.is_some();
        let description_value = changes.description.as_ref().and_then(|d| d.as_deref());

        let query = format!(
            "UPDATE todos SET \
                 title       = COALESCE($2, title), \
                 description = CASE WHEN $3 THEN $4 ELSE description END, \
                 priority    = COALESCE($5, priority), \
                 completed   = COALESCE($6, completed), \
                 updated_at  = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(description_provided)
            .bind(description_value)
            .bind(changes.priority.map(Priority::as_str))
            .bind(changes.completed)
            .fetch_optional(pool)
            .await
    }

    /// Delete a todo by ID.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build the `ORDER BY` body. Only whitelisted column expressions are
/// interpolated; ties fall back to insertion order.
fn order_clause(plan: &ReadPlan) -> String {
    let column = match plan.sort_by {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Title => "title COLLATE \"C\"",
        SortField::Priority => {
            "CASE priority WHEN 'low' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END"
        }
    };
    let direction = match plan.sort_order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!("{column} {direction}, id ASC")
}

/// `ILIKE` pattern matching `text` anywhere, with `%`, `_` and `\` taken
/// literally.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
