//! Pagination and sorting for task listings
//!
//! [`PageConfig::resolve`] turns the four raw listing parameters into a
//! validated configuration, starting from [`PageConfig::default`] for
//! anything left blank.
//!
//! # Example
//!
//! ```rust
//! use task_service::query::{PageConfig, SortField, SortOrder};
//!
//! let page = PageConfig::resolve(Some("20"), Some("5"), Some("DUE_DATE"), Some("desc")).unwrap();
//! assert_eq!(page.offset, 20);
//! assert_eq!(page.limit, 5);
//! assert_eq!(page.sort_by, SortField::DueDate);
//! assert_eq!(page.sort_order, SortOrder::Desc);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Default number of tasks per page
pub const DEFAULT_LIMIT: u64 = 10;

/// Column names accepted by `sort_by`, in display order
pub const SORTABLE_FIELDS: [&str; 6] = ["id", "title", "status", "priority", "created_at", "due_date"];

/// Column a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Id,
    Title,
    Status,
    Priority,
    CreatedAt,
    DueDate,
}

impl SortField {
    /// Case-insensitive lookup against the whitelist
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "created_at" => Ok(Self::CreatedAt),
            "due_date" => Ok(Self::DueDate),
            _ => Err(ValidationError::InvalidSortField),
        }
    }

    /// Column name, safe to splice into SQL
    pub const fn as_column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::CreatedAt => "created_at",
            Self::DueDate => "due_date",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_column())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending (A-Z, 0-9, oldest first)
    #[default]
    Asc,
    /// Descending (Z-A, 9-0, newest first)
    Desc,
}

impl SortOrder {
    /// Case-insensitive lookup of `asc` / `desc`
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ValidationError::InvalidSortOrder),
        }
    }

    /// Convert to SQL ORDER BY clause fragment
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Raw pagination inputs of a listing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub offset: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

/// Resolved offset, limit and ordering for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageConfig {
    pub offset: u64,
    /// Always greater than zero
    pub limit: u64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            sort_by: SortField::Id,
            sort_order: SortOrder::Asc,
        }
    }
}

impl PageConfig {
    /// Resolve raw inputs, checking offset, limit, sort field and sort
    /// order in that order. The first failure is returned.
    pub fn resolve(
        offset: Option<&str>,
        limit: Option<&str>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let mut page = Self::default();

        if let Some(raw) = non_blank(offset) {
            page.offset = raw.parse::<u64>().map_err(|_| ValidationError::InvalidOffset)?;
        }
        if let Some(raw) = non_blank(limit) {
            page.limit = raw
                .parse::<u64>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ValidationError::InvalidLimit)?;
        }
        if let Some(raw) = non_blank(sort_by) {
            page.sort_by = SortField::parse(raw)?;
        }
        if let Some(raw) = non_blank(sort_order) {
            page.sort_order = SortOrder::parse(raw)?;
        }

        Ok(page)
    }

    /// Resolve from deserialized query parameters
    pub fn from_params(params: &PageParams) -> Result<Self, ValidationError> {
        Self::resolve(
            params.offset.as_deref(),
            params.limit.as_deref(),
            params.sort_by.as_deref(),
            params.sort_order.as_deref(),
        )
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the limit; zero is bumped to one
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_by: SortField, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}
