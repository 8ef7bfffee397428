//! Query parameter types for API handlers.

use todos_core::read_plan::ListParams;

/// Query parameters for `GET /todos`.
///
/// Values stay as raw strings so malformed input is judged by the resolver
/// (strict or lenient) instead of failing extraction.
#[derive(Debug, Default)]
pub struct ListTodosQuery {
    pub q: Option<String>,
    pub completed: Option<String>,
    pub priority: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListTodosQuery {
    /// Build from decoded query-string pairs. A repeated parameter keeps its
    /// last value; unknown parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut query.q,
                "completed" => &mut query.completed,
                "priority" => &mut query.priority,
                "sortBy" => &mut query.sort_by,
                "sortOrder" => &mut query.sort_order,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }

    pub fn as_params(&self) -> ListParams<'_> {
        ListParams {
            q: self.q.as_deref(),
            completed: self.completed.as_deref(),
            priority: self.priority.as_deref(),
            sort_by: self.sort_by.as_deref(),
            sort_order: self.sort_order.as_deref(),
        }
    }
}
