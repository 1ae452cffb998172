//! Input validation shared by every endpoint
//!
//! All checks here run before any storage call is attempted.

use thiserror::Error;

use crate::model::{NewTask, TaskUpdate};
use crate::query::page::SORTABLE_FIELDS;

/// Rejected client input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: '{0}'")]
    MissingField(&'static str),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("at least one field must be present: 'title', 'description', 'priority', 'status', 'due_date'")]
    EmptyUpdate,

    #[error("invalid task id: '{0}'")]
    InvalidId(String),

    #[error("invalid 'offset' value, must be int >= 0")]
    InvalidOffset,

    #[error("invalid 'limit' value, must be int > 0")]
    InvalidLimit,

    #[error("invalid 'sortBy' value. Valid values: [{}]", SORTABLE_FIELDS.join(" "))]
    InvalidSortField,

    #[error("invalid 'sortOrder' value. Valid values: ['asc', 'desc']")]
    InvalidSortOrder,

    #[error("invalid due_date format, expects: 'yyyy-mm-dd'")]
    InvalidDueDateFormat,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("invalid {field} filter: {reason}")]
    InvalidFilter {
        field: &'static str,
        reason: &'static str,
    },
}

/// Check that a create payload carries a non-empty title
pub fn validate_new_task(task: &NewTask) -> Result<(), ValidationError> {
    match task.title.as_deref() {
        None => Err(ValidationError::MissingField("title")),
        Some("") => Err(ValidationError::EmptyTitle),
        Some(_) => Ok(()),
    }
}

/// Check that an update payload has at least one field present
pub fn validate_update(update: &TaskUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }
    Ok(())
}

/// Parse a raw path segment into a task id
///
/// # Example
///
/// ```rust
/// use task_service::validation::validate_task_id;
///
/// assert_eq!(validate_task_id("42"), Ok(42));
/// assert!(validate_task_id("-10").is_err());
/// ```
pub fn validate_task_id(raw: &str) -> Result<u64, ValidationError> {
    raw.parse::<u64>()
        .map_err(|_| ValidationError::InvalidId(raw.to_string()))
}
