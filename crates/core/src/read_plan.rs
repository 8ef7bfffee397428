//! List query resolution.
//!
//! Turns the raw `q`, `completed`, `priority`, `sortBy` and `sortOrder`
//! parameters into a [`ReadPlan`]: the filters plus the sort order that a
//! store applies. Resolution is pure.
//!
//! Filters combine with AND; the text filter matches title OR description.
//! Sorting always breaks ties by ascending id (insertion order).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use validator::{ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::todo::Priority;

/* --------------------------------------------------------------------------
   Sort keys
   -------------------------------------------------------------------------- */

/// Field a list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Priority,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::Title,
        SortField::Priority,
    ];

    /// Query-string spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Title => "title",
            SortField::Priority => "priority",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == raw)
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/* --------------------------------------------------------------------------
   Malformed parameter policy
   -------------------------------------------------------------------------- */

/// How malformed list parameters are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryParamMode {
    /// Reject the request with a validation error naming each bad parameter.
    #[default]
    Strict,
    /// Drop malformed filters and fall back to the default sort.
    Lenient,
}

impl QueryParamMode {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryParamMode::Strict => "strict",
            QueryParamMode::Lenient => "lenient",
        }
    }
}

impl fmt::Display for QueryParamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryParamMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(QueryParamMode::Strict),
            "lenient" => Ok(QueryParamMode::Lenient),
            other => Err(CoreError::Validation(format!(
                "Invalid query parameter mode '{other}'. Must be one of: strict, lenient"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
   Plan
   -------------------------------------------------------------------------- */

/// Raw list parameters as they arrived. Empty strings count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams<'a> {
    pub q: Option<&'a str>,
    pub completed: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub sort_by: Option<&'a str>,
    pub sort_order: Option<&'a str>,
}

/// Resolved filters and ordering for a list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadPlan {
    /// Case-insensitive substring matched against title or description.
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl ReadPlan {
    /// Resolve raw parameters under the given mode.
    pub fn resolve(params: &ListParams<'_>, mode: QueryParamMode) -> Result<Self, CoreError> {
        let mut errors = ValidationErrors::new();
        let mut plan = ReadPlan {
            // Blankness is judged on the trimmed value; the needle keeps its spaces.
            text: params
                .q
                .filter(|q| !q.trim().is_empty())
                .map(str::to_string),
            ..Default::default()
        };

        if let Some(raw) = present(params.completed) {
            match parse_bool(raw) {
                Some(value) => plan.completed = Some(value),
                None => reject(&mut errors, mode, "completed", raw, "true, false"),
            }
        }

        if let Some(raw) = present(params.priority) {
            match raw.parse::<Priority>() {
                Ok(value) => plan.priority = Some(value),
                Err(_) => reject(
                    &mut errors,
                    mode,
                    "priority",
                    raw,
                    &Priority::expected_values(),
                ),
            }
        }

        if let Some(raw) = present(params.sort_by) {
            match SortField::parse(raw) {
                Some(value) => plan.sort_by = value,
                None => reject(
                    &mut errors,
                    mode,
                    "sortBy",
                    raw,
                    "createdAt, updatedAt, title, priority",
                ),
            }
        }

        if let Some(raw) = present(params.sort_order) {
            match SortOrder::parse(raw) {
                Some(value) => plan.sort_order = value,
                None => reject(&mut errors, mode, "sortOrder", raw, "asc, desc"),
            }
        }

        if errors.is_empty() {
            Ok(plan)
        } else {
            Err(CoreError::InvalidInput(errors))
        }
    }

    /// Whether the text filter (if any) matches a todo's title or description.
    pub fn text_matches(&self, title: &str, description: Option<&str>) -> bool {
        let Some(needle) = &self.text else {
            return true;
        };
        let needle = needle.to_lowercase();
        title.to_lowercase().contains(&needle)
            || description.is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Trim and drop empty values.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

/// Record a malformed parameter, or log and skip it in lenient mode.
fn reject(
    errors: &mut ValidationErrors,
    mode: QueryParamMode,
    param: &'static str,
    raw: &str,
    expected: &str,
) {
    match mode {
        QueryParamMode::Strict => {
            let mut err = ValidationError::new("invalid_value").with_message(Cow::Owned(
                format!("Invalid value '{raw}' for '{param}'. Must be one of: {expected}"),
            ));
            err.add_param(Cow::Borrowed("value"), &raw);
            errors.add(param, err);
        }
        QueryParamMode::Lenient => {
            tracing::debug!(param, value = raw, "Ignoring malformed list parameter");
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn strict(params: ListParams<'_>) -> Result<ReadPlan, CoreError> {
        ReadPlan::resolve(&params, QueryParamMode::Strict)
    }

    fn lenient(params: ListParams<'_>) -> ReadPlan {
        ReadPlan::resolve(&params, QueryParamMode::Lenient).unwrap()
    }

    #[test]
    fn defaults_to_created_at_desc_without_filters() {
        let plan = strict(ListParams::default()).unwrap();
        assert_eq!(plan, ReadPlan::default());
        assert_eq!(plan.sort_by, SortField::CreatedAt);
        assert_eq!(plan.sort_order, SortOrder::Desc);
    }

    #[test]
    fn resolves_all_parameters() {
        let plan = strict(ListParams {
            q: Some("milk"),
            completed: Some("true"),
            priority: Some("high"),
            sort_by: Some("priority"),
            sort_order: Some("asc"),
        })
        .unwrap();

        assert_eq!(plan.text.as_deref(), Some("milk"));
        assert_eq!(plan.completed, Some(true));
        assert_eq!(plan.priority, Some(Priority::High));
        assert_eq!(plan.sort_by, SortField::Priority);
        assert_eq!(plan.sort_order, SortOrder::Asc);
    }

    #[test]
    fn empty_values_are_absent() {
        let plan = strict(ListParams {
            q: Some("  "),
            completed: Some(""),
            priority: Some(""),
            sort_by: Some(""),
            sort_order: Some(""),
        })
        .unwrap();
        assert_eq!(plan, ReadPlan::default());
    }

    #[test]
    fn search_text_keeps_surrounding_spaces() {
        let plan = strict(ListParams {
            q: Some(" milk"),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(plan.text.as_deref(), Some(" milk"));
        assert!(plan.text_matches("Buy milk", None));
        assert!(!plan.text_matches("Buymilk", None));
    }

    #[test]
    fn completed_accepts_common_spellings() {
        for (raw, expected) in [("TRUE", true), ("1", true), ("False", false), ("0", false)] {
            let plan = strict(ListParams {
                completed: Some(raw),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(plan.completed, Some(expected), "raw value {raw}");
        }
    }

    #[test]
    fn strict_mode_names_every_malformed_parameter() {
        let err = strict(ListParams {
            completed: Some("yes"),
            priority: Some("urgent"),
            sort_by: Some("id"),
            sort_order: Some("up"),
            ..Default::default()
        })
        .unwrap_err();

        assert_matches!(err, CoreError::InvalidInput(errors) => {
            let fields = errors.field_errors();
            let mut names: Vec<String> = fields.keys().map(|k| k.to_string()).collect();
            names.sort();
            assert_eq!(names, vec!["completed", "priority", "sortBy", "sortOrder"]);
        });
    }

    #[test]
    fn strict_mode_rejects_wrong_case_sort_field() {
        assert!(strict(ListParams {
            sort_by: Some("created_at"),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn lenient_mode_falls_back_to_defaults() {
        let plan = lenient(ListParams {
            q: Some("x"),
            completed: Some("yes"),
            priority: Some("urgent"),
            sort_by: Some("id"),
            sort_order: Some("up"),
        });

        assert_eq!(plan.text.as_deref(), Some("x"));
        assert_eq!(plan.completed, None);
        assert_eq!(plan.priority, None);
        assert_eq!(plan.sort_by, SortField::CreatedAt);
        assert_eq!(plan.sort_order, SortOrder::Desc);
    }

    #[test]
    fn lenient_mode_keeps_valid_parameters() {
        let plan = lenient(ListParams {
            completed: Some("false"),
            sort_by: Some("bogus"),
            sort_order: Some("asc"),
            ..Default::default()
        });
        assert_eq!(plan.completed, Some(false));
        assert_eq!(plan.sort_by, SortField::CreatedAt);
        assert_eq!(plan.sort_order, SortOrder::Asc);
    }

    #[test]
    fn text_filter_is_case_insensitive_over_title_or_description() {
        let plan = ReadPlan {
            text: Some("MiLk".into()),
            ..Default::default()
        };
        assert!(plan.text_matches("Buy milk", None));
        assert!(plan.text_matches("Groceries", Some("oat MILK and bread")));
        assert!(!plan.text_matches("Groceries", None));
        assert!(!plan.text_matches("Groceries", Some("bread")));

        assert!(ReadPlan::default().text_matches("anything", None));
    }

    #[test]
    fn query_param_mode_parses() {
        assert_eq!(
            "Lenient".parse::<QueryParamMode>().unwrap(),
            QueryParamMode::Lenient
        );
        assert_eq!(
            "strict".parse::<QueryParamMode>().unwrap(),
            QueryParamMode::Strict
        );
        assert!("loose".parse::<QueryParamMode>().is_err());
    }
}
