//! Filter builder for task listings
//!
//! Turns the named raw filter inputs of a listing request into an ordered
//! list of [`FilterClause`]s. Clauses are AND-combined; their order only
//! decides placeholder numbering, which is derived from each clause's
//! position when the statement is rendered.
//!
//! # Example
//!
//! ```rust
//! use task_service::query::FilterBuilder;
//!
//! let mut filters = FilterBuilder::new();
//! filters.append("title_contains", "report").unwrap();
//! filters.append("status", "done").unwrap();
//! filters.append("color", "blue").unwrap(); // unknown, ignored
//!
//! let fragments: Vec<String> = filters.fragments().collect();
//! assert_eq!(fragments, vec!["title LIKE $1", "status = $2"]);
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::validation::ValidationError;

/// Accepted characters for text filters
static TEXT_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9\s.,!?_-]+$").expect("text filter regex is valid")
});

/// A filterable input, identified by its request parameter name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    /// Substring match on the title
    TitleContains,
    /// Substring match on the description
    DescriptionContains,
    /// Exact status match
    Status,
    /// Exact priority match
    Priority,
}

impl FilterField {
    /// Look up a field by request parameter name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title_contains" => Some(Self::TitleContains),
            "description_contains" => Some(Self::DescriptionContains),
            "status" => Some(Self::Status),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }

    /// Column the field filters on
    pub const fn column(&self) -> &'static str {
        match self {
            Self::TitleContains => "title",
            Self::DescriptionContains => "description",
            Self::Status => "status",
            Self::Priority => "priority",
        }
    }

    /// Comparison used against the column
    pub const fn operator(&self) -> FilterOperator {
        match self {
            Self::TitleContains | Self::DescriptionContains => FilterOperator::Like,
            Self::Status | Self::Priority => FilterOperator::Equal,
        }
    }
}

/// Comparison operators a clause can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Case-sensitive pattern match (LIKE)
    Like,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::Like => write!(f, "LIKE"),
        }
    }
}

/// A value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{}'", s),
            Self::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// One predicate fragment and the value bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: FilterField,
    pub value: SqlValue,
}

impl FilterClause {
    /// Render the fragment with the given 1-based placeholder number
    pub fn fragment(&self, placeholder: usize) -> String {
        format!(
            "{} {} ${}",
            self.field.column(),
            self.field.operator(),
            placeholder
        )
    }

    /// Whether a task's column values satisfy this clause.
    ///
    /// Mirrors the SQL semantics for backends that evaluate clauses
    /// directly: `LIKE '%v%'` becomes a case-sensitive substring test in
    /// which `_` matches any single character.
    pub fn matches(&self, title: &str, description: &str, status: &str, priority: u16) -> bool {
        match (&self.field, &self.value) {
            (FilterField::TitleContains, SqlValue::Text(pattern)) => {
                like_contains(title, strip_wildcards(pattern))
            }
            (FilterField::DescriptionContains, SqlValue::Text(pattern)) => {
                like_contains(description, strip_wildcards(pattern))
            }
            (FilterField::Status, SqlValue::Text(value)) => status == value,
            (FilterField::Priority, SqlValue::Integer(value)) => i64::from(priority) == *value,
            _ => false,
        }
    }
}

fn strip_wildcards(pattern: &str) -> &str {
    pattern
        .strip_prefix('%')
        .and_then(|p| p.strip_suffix('%'))
        .unwrap_or(pattern)
}

// Substring search where `_` in `needle` stands for any one character.
fn like_contains(haystack: &str, needle: &str) -> bool {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return true;
    }
    let haystack: Vec<char> = haystack.chars().collect();
    haystack.windows(needle.len()).any(|window| {
        window
            .iter()
            .zip(&needle)
            .all(|(have, want)| *want == '_' || have == want)
    })
}

/// Raw filter inputs of a listing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub title_contains: Option<String>,
    #[serde(default)]
    pub description_contains: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Ordered, append-only list of filter clauses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBuilder {
    clauses: Vec<FilterClause>,
}

impl FilterBuilder {
    /// Create an empty builder (no filtering)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the four named inputs, in title, description, status,
    /// priority order.
    pub fn from_params(params: &FilterParams) -> Result<Self, ValidationError> {
        let mut builder = Self::new();
        let inputs = [
            (FilterField::TitleContains, &params.title_contains),
            (FilterField::DescriptionContains, &params.description_contains),
            (FilterField::Status, &params.status),
            (FilterField::Priority, &params.priority),
        ];
        for (field, raw) in inputs {
            if let Some(raw) = raw {
                builder.push(field, raw)?;
            }
        }
        Ok(builder)
    }

    /// Append a filter by parameter name.
    ///
    /// Unknown names and empty values add nothing.
    pub fn append(&mut self, name: &str, raw: &str) -> Result<&mut Self, ValidationError> {
        match FilterField::from_name(name) {
            Some(field) => self.push(field, raw),
            None => {
                tracing::debug!(filter = name, "Ignoring unknown filter");
                Ok(self)
            }
        }
    }

    /// Append a filter for a known field
    pub fn push(&mut self, field: FilterField, raw: &str) -> Result<&mut Self, ValidationError> {
        if raw.is_empty() {
            return Ok(self);
        }
        let value = match field {
            FilterField::TitleContains | FilterField::DescriptionContains => {
                check_text(field, raw)?;
                SqlValue::Text(format!("%{}%", raw))
            }
            FilterField::Status => {
                check_text(field, raw)?;
                SqlValue::Text(raw.to_string())
            }
            // Out-of-range priorities are valid input that matches nothing.
            FilterField::Priority => raw
                .parse::<u64>()
                .map(|p| SqlValue::Integer(i64::try_from(p).unwrap_or(i64::MAX)))
                .map_err(|_| ValidationError::InvalidFilter {
                    field: "priority",
                    reason: "must be positive integer",
                })?,
        };
        self.clauses.push(FilterClause { field, value });
        Ok(self)
    }

    /// Clauses in append order
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Rendered fragments, numbered `$1..` by position
    pub fn fragments(&self) -> impl Iterator<Item = String> + '_ {
        self.clauses
            .iter()
            .enumerate()
            .map(|(position, clause)| clause.fragment(position + 1))
    }

    /// Bound values, in the same order as [`fragments`](Self::fragments)
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> + '_ {
        self.clauses.iter().map(|clause| &clause.value)
    }
}

fn check_text(field: FilterField, raw: &str) -> Result<(), ValidationError> {
    if TEXT_FILTER.is_match(raw) {
        return Ok(());
    }
    let field = match field {
        FilterField::TitleContains => "title",
        FilterField::DescriptionContains => "description",
        FilterField::Status => "status",
        FilterField::Priority => "priority",
    };
    Err(ValidationError::InvalidFilter {
        field,
        reason: "must be alphanumeric",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_numbers_placeholders_by_position() {
        let mut filters = FilterBuilder::new();
        filters.append("title_contains", "title_value").unwrap();
        filters.append("description_contains", "description_value").unwrap();
        filters.append("status", "status_value").unwrap();
        filters.append("priority", "4").unwrap();

        let fragments: Vec<String> = filters.fragments().collect();
        assert_eq!(
            fragments,
            vec![
                "title LIKE $1",
                "description LIKE $2",
                "status = $3",
                "priority = $4",
            ]
        );

        let values: Vec<&SqlValue> = filters.values().collect();
        assert_eq!(
            values,
            vec![
                &SqlValue::Text("%title_value%".to_string()),
                &SqlValue::Text("%description_value%".to_string()),
                &SqlValue::Text("status_value".to_string()),
                &SqlValue::Integer(4),
            ]
        );
    }

    #[test]
    fn test_append_order_is_kept() {
        let mut filters = FilterBuilder::new();
        filters.append("priority", "2").unwrap();
        filters.append("title_contains", "Task").unwrap();

        let fragments: Vec<String> = filters.fragments().collect();
        assert_eq!(fragments, vec!["priority = $1", "title LIKE $2"]);
    }

    #[test]
    fn test_unknown_filter_is_ignored() {
        let mut filters = FilterBuilder::new();
        filters.append("dueDate", "2025-01-01").unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_empty_inputs_add_nothing() {
        let filters = FilterBuilder::from_params(&FilterParams {
            title_contains: Some(String::new()),
            description_contains: None,
            status: Some(String::new()),
            priority: Some(String::new()),
        })
        .unwrap();
        assert!(filters.is_empty());
        assert_eq!(filters.fragments().count(), 0);
    }

    #[test]
    fn test_from_params_builds_all_four() {
        let filters = FilterBuilder::from_params(&FilterParams {
            title_contains: Some("title_value".to_string()),
            description_contains: Some("description_value".to_string()),
            status: Some("status_value".to_string()),
            priority: Some("1".to_string()),
        })
        .unwrap();
        assert_eq!(filters.len(), 4);
        assert_eq!(filters.clauses()[3].value, SqlValue::Integer(1));
    }

    #[test]
    fn test_rejects_non_alphanumeric_text() {
        let err = FilterBuilder::new().append("title_contains", "{}").unwrap_err();
        assert_eq!(err.to_string(), "invalid title filter: must be alphanumeric");

        let err = FilterBuilder::new().append("description_contains", "()").unwrap_err();
        assert_eq!(err.to_string(), "invalid description filter: must be alphanumeric");

        let err = FilterBuilder::new().append("status", ">").unwrap_err();
        assert_eq!(err.to_string(), "invalid status filter: must be alphanumeric");
    }

    #[test]
    fn test_out_of_range_priority_is_accepted() {
        let mut filters = FilterBuilder::new();
        filters.append("priority", "70000").unwrap();
        assert_eq!(filters.values().next(), Some(&SqlValue::Integer(70000)));
        assert!(!filters.clauses()[0].matches("", "", "", u16::MAX));

        let mut filters = FilterBuilder::new();
        filters.append("priority", "18446744073709551615").unwrap();
        assert_eq!(filters.values().next(), Some(&SqlValue::Integer(i64::MAX)));
    }

    #[test]
    fn test_rejects_non_numeric_priority() {
        for raw in ["alpha", "-1", "1.5"] {
            let err = FilterBuilder::new().append("priority", raw).unwrap_err();
            assert_eq!(err.to_string(), "invalid priority filter: must be positive integer");
        }
    }

    #[test]
    fn test_clause_matching() {
        let like = FilterClause {
            field: FilterField::TitleContains,
            value: SqlValue::Text("%Task%".to_string()),
        };
        assert!(like.matches("Second Task", "", "done", 1));
        assert!(!like.matches("second task", "", "done", 1));

        let underscore = FilterClause {
            field: FilterField::DescriptionContains,
            value: SqlValue::Text("%v_1%".to_string()),
        };
        assert!(underscore.matches("", "build v21", "", 0));
        assert!(underscore.matches("", "v_1", "", 0));
        assert!(!underscore.matches("", "v1", "", 0));

        let priority = FilterClause {
            field: FilterField::Priority,
            value: SqlValue::Integer(5),
        };
        assert!(priority.matches("", "", "", 5));
        assert!(!priority.matches("", "", "", 4));
    }
}
