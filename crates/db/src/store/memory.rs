use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use todos_core::read_plan::{ReadPlan, SortField, SortOrder};
use todos_core::todo::{NewTodo, TodoChanges};
use todos_core::types::{DbId, Timestamp};

use super::TodoStore;
use crate::models::todo::Todo;

/// [`TodoStore`] holding todos in process memory.
///
/// Rows are keyed by id in a `BTreeMap`, so iteration order is insertion
/// order and a stable sort keeps ties in that order, matching the
/// `ORDER BY ..., id ASC` of the PostgreSQL store. Ids are never reused.
#[derive(Default)]
pub struct MemoryTodoStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: DbId,
    rows: BTreeMap<DbId, Todo>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos.
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self, plan: &ReadPlan) -> Result<Vec<Todo>, sqlx::Error> {
        let state = self.state.read().await;
        let mut todos: Vec<Todo> = state
            .rows
            .values()
            .filter(|t| matches_plan(t, plan))
            .cloned()
            .collect();
        todos.sort_by(|a, b| {
            let ord = compare_field(a, b, plan.sort_by);
            match plan.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        Ok(todos)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, input: &NewTodo) -> Result<Todo, sqlx::Error> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: state.last_id,
            title: input.title.clone(),
            description: input.description.clone(),
            priority: input.priority,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: DbId, changes: &TodoChanges) -> Result<Option<Todo>, sqlx::Error> {
        let mut state = self.state.write().await;
        let Some(todo) = state.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(description) = &changes.description {
            todo.description = description.clone();
        }
        if let Some(priority) = changes.priority {
            todo.priority = priority;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = next_updated_at(todo.updated_at, Utc::now());

        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.state.write().await.rows.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

fn matches_plan(todo: &Todo, plan: &ReadPlan) -> bool {
    plan.completed.is_none_or(|c| todo.completed == c)
        && plan.priority.is_none_or(|p| todo.priority == p)
        && plan.text_matches(&todo.title, todo.description.as_deref())
}

fn compare_field(a: &Todo, b: &Todo, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Priority => a.priority.cmp(&b.priority),
    }
}

/// Strictly later than `previous`, at microsecond resolution like
/// PostgreSQL's `TIMESTAMPTZ`.
fn next_updated_at(previous: Timestamp, now: Timestamp) -> Timestamp {
    let floor = previous + chrono::Duration::microseconds(1);
    if now > floor {
        now
    } else {
        floor
    }
}
