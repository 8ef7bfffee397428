//! Todo row model and request DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use todos_core::error::CoreError;
use todos_core::todo::{normalize_description, validate_title, NewTodo, Priority, TodoChanges};
use todos_core::types::{DbId, Timestamp};
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity struct (database row)
// ---------------------------------------------------------------------------

/// A row from the `todos` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a todo.
///
/// A missing `title` deserializes as empty so it is reported by validation
/// under its field name rather than as a parse failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTodo {
    #[serde(default)]
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl CreateTodo {
    /// Validate and normalize into a [`NewTodo`].
    pub fn validate_create(self) -> Result<NewTodo, CoreError> {
        self.validate()?;
        Ok(NewTodo {
            title: self.title.trim().to_string(),
            description: normalize_description(self.description),
            priority: self.priority.unwrap_or_default(),
        })
    }
}

/// DTO for partially updating a todo.
///
/// `description` distinguishes "omitted" (outer `None`, unchanged) from
/// `null` (`Some(None)`, cleared).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTodo {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl UpdateTodo {
    /// Validate and normalize into [`TodoChanges`].
    pub fn validate_update(self) -> Result<TodoChanges, CoreError> {
        self.validate()?;
        Ok(TodoChanges {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(normalize_description),
            priority: self.priority,
            completed: self.completed,
        })
    }
}

/// Wrap any present value (including `null`) in `Some`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
