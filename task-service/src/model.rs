//! Task entity and request payloads
//!
//! [`Task`] is the only persisted entity. [`NewTask`] and [`TaskUpdate`] are
//! the sparse payloads clients send: every field is an `Option`, so "absent"
//! is never confused with an empty string.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Calendar format accepted for due dates
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Status given to tasks created without one
pub const DEFAULT_STATUS: &str = "pending";

/// Days until a task created without a due date falls due
pub const DEFAULT_DUE_IN_DAYS: i64 = 7;

/// A stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Storage-generated identifier
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: u16,
    /// Set once when the task is created
    pub created_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Payload for creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<u16>,
    /// `yyyy-mm-dd`
    #[serde(default)]
    pub due_date: Option<String>,
}

impl NewTask {
    /// Start a payload with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the priority
    #[must_use]
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the due date (`yyyy-mm-dd`)
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Turn the payload into a task ready for insertion.
    ///
    /// The id is left at 0; storage assigns the real one. Missing optional
    /// fields take their defaults, and a missing due date falls
    /// [`DEFAULT_DUE_IN_DAYS`] after `now`.
    pub fn into_task(self, now: DateTime<Utc>) -> Result<Task, ValidationError> {
        let title = match self.title {
            None => return Err(ValidationError::MissingField("title")),
            Some(title) if title.is_empty() => return Err(ValidationError::EmptyTitle),
            Some(title) => title,
        };
        let due_date = match self.due_date.as_deref() {
            Some(raw) => parse_due_date(raw)?,
            None => now + Duration::days(DEFAULT_DUE_IN_DAYS),
        };

        Ok(Task {
            id: 0,
            title,
            description: self.description.unwrap_or_default(),
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            priority: self.priority.unwrap_or(0),
            created_at: now,
            due_date,
        })
    }
}

/// Sparse update payload; only present fields overwrite the stored task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<u16>,
    /// `yyyy-mm-dd`
    #[serde(default)]
    pub due_date: Option<String>,
}

impl TaskUpdate {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Parse the text fields that need it, producing a patch that can be
    /// merged without further failure.
    pub fn into_patch(self) -> Result<TaskPatch, ValidationError> {
        let due_date = self.due_date.as_deref().map(parse_due_date).transpose()?;
        Ok(TaskPatch {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date,
        })
    }
}

/// A validated [`TaskUpdate`] with its due date already parsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<u16>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Overlay the present fields onto `current`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_to(self, mut current: Task) -> Task {
        if let Some(title) = self.title {
            current.title = title;
        }
        if let Some(description) = self.description {
            current.description = description;
        }
        if let Some(status) = self.status {
            current.status = status;
        }
        if let Some(priority) = self.priority {
            current.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            current.due_date = due_date;
        }
        current
    }
}

/// Parse a `yyyy-mm-dd` due date into midnight UTC of that day
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or(ValidationError::InvalidDueDateFormat)
}

/// Render a due date back into `yyyy-mm-dd`
pub fn format_due_date(due_date: &DateTime<Utc>) -> String {
    due_date.format(DUE_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored_task() -> Task {
        let created = Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap();
        Task {
            id: 1,
            title: "A".to_string(),
            description: "first".to_string(),
            status: "pending".to_string(),
            priority: 1,
            created_at: created,
            due_date: parse_due_date("2025-02-10").unwrap(),
        }
    }

    #[test]
    fn test_due_date_round_trip() {
        let parsed = parse_due_date("2025-03-10").unwrap();
        assert_eq!(format_due_date(&parsed), "2025-03-10");
    }

    #[test]
    fn test_due_date_rejects_other_formats() {
        for raw in ["10-03-2025", "2025/03/10", "2025-13-01", "", "tomorrow"] {
            assert_eq!(
                parse_due_date(raw),
                Err(ValidationError::InvalidDueDateFormat),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_new_task_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let task = NewTask::titled("Write report").into_task(now).unwrap();

        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "");
        assert_eq!(task.status, DEFAULT_STATUS);
        assert_eq!(task.priority, 0);
        assert_eq!(task.created_at, now);
        assert_eq!(task.due_date, now + Duration::days(7));
    }

    #[test]
    fn test_new_task_title_checks() {
        let now = Utc::now();
        assert_eq!(
            NewTask::default().into_task(now),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            NewTask::titled("").into_task(now),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn test_update_is_empty() {
        assert!(TaskUpdate::default().is_empty());
        let update = TaskUpdate {
            description: Some(String::new()),
            ..TaskUpdate::default()
        };
        // An empty string is a present value, not an absent one.
        assert!(!update.is_empty());
    }

    #[test]
    fn test_patch_keeps_unspecified_fields() {
        let current = stored_task();
        let patch = TaskUpdate {
            status: Some("done".to_string()),
            ..TaskUpdate::default()
        }
        .into_patch()
        .unwrap();

        let merged = patch.apply_to(current.clone());

        assert_eq!(merged.status, "done");
        assert_eq!(merged.title, "A");
        assert_eq!(merged.priority, 1);
        assert_eq!(merged.description, current.description);
        assert_eq!(merged.due_date, current.due_date);
        assert_eq!(merged.created_at, current.created_at);
        assert_eq!(merged.id, current.id);
    }

    #[test]
    fn test_patch_overwrites_with_empty_description() {
        let patch = TaskUpdate {
            description: Some(String::new()),
            due_date: Some("2030-01-31".to_string()),
            ..TaskUpdate::default()
        }
        .into_patch()
        .unwrap();

        let merged = patch.apply_to(stored_task());
        assert_eq!(merged.description, "");
        assert_eq!(format_due_date(&merged.due_date), "2030-01-31");
    }

    #[test]
    fn test_patch_rejects_bad_due_date() {
        let update = TaskUpdate {
            due_date: Some("31/01/2030".to_string()),
            ..TaskUpdate::default()
        };
        assert_eq!(update.into_patch(), Err(ValidationError::InvalidDueDateFormat));
    }

    #[test]
    fn test_update_deserializes_absent_fields_as_none() {
        let update: TaskUpdate = serde_json::from_str(r#"{"status": "done"}"#).unwrap();
        assert_eq!(update.status.as_deref(), Some("done"));
        assert!(update.title.is_none());
        assert!(update.priority.is_none());
    }
}
