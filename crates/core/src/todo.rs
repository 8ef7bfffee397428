//! Todo entity rules.
//!
//! Priority levels, field constraints, and the normalized write inputs that
//! the persistence layer accepts. Request DTOs in `todos-db` validate into
//! [`NewTodo`] and [`TodoChanges`] before anything reaches a store.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::error::CoreError;
use crate::types::DbId;

/// Entity name used in not-found errors.
pub const ENTITY_TODO: &str = "Todo";

/// Maximum title length, in characters, after trimming.
pub const MAX_TITLE_LEN: usize = 100;

/* --------------------------------------------------------------------------
   Priority
   -------------------------------------------------------------------------- */

/// Importance level of a todo. Declaration order is the sort rank.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All levels, lowest first.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Comma-separated list of accepted values, for error messages.
    pub fn expected_values() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid priority '{s}'. Must be one of: {}",
                    Self::expected_values()
                ))
            })
    }
}

impl TryFrom<String> for Priority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/* --------------------------------------------------------------------------
   Field rules
   -------------------------------------------------------------------------- */

/// Title rule: non-blank and at most [`MAX_TITLE_LEN`] characters once
/// surrounding whitespace is removed.
///
/// Shaped for `#[validate(custom(function = "validate_title"))]`.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("Title is required")));
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        let mut err = ValidationError::new("too_long").with_message(Cow::Owned(format!(
            "Title must be at most {MAX_TITLE_LEN} characters (got {len})"
        )));
        err.add_param(Cow::Borrowed("max"), &MAX_TITLE_LEN);
        return Err(err);
    }
    Ok(())
}

/// Blank descriptions are stored as absent.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

/// Parse a todo id from a path segment. Ids are positive integers.
pub fn parse_todo_id(raw: &str) -> Result<DbId, CoreError> {
    match raw.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::Validation(format!(
            "Invalid todo id '{raw}'. Must be a positive integer"
        ))),
    }
}

/* --------------------------------------------------------------------------
   Normalized write inputs
   -------------------------------------------------------------------------- */

/// A validated creation payload. `completed` always starts `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
}

/// A validated partial update. `None` leaves the field untouched;
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    /// True when the update names no fields. Such an update still
    /// refreshes `updated_at`.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
    }
}
