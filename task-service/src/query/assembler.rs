//! Rendering of the listing statement
//!
//! [`TaskQuery::assemble`] combines a [`FilterBuilder`] and a [`PageConfig`]
//! into a single parameterized `SELECT` plus its bound values. Placeholders
//! are numbered from the clause positions, so the filter values come first,
//! then `LIMIT`, then `OFFSET`.
//!
//! # Example
//!
//! ```rust
//! use task_service::query::{FilterBuilder, PageConfig, SortField, SortOrder, TaskQuery};
//!
//! let mut filters = FilterBuilder::new();
//! filters.append("status", "done").unwrap();
//! let page = PageConfig::default().with_sort(SortField::DueDate, SortOrder::Desc);
//!
//! let query = TaskQuery::assemble(&filters, &page);
//! assert_eq!(
//!     query.statement(),
//!     "SELECT id, title, description, status, priority, created_at, due_date FROM tasks \
//!      WHERE status = $1 ORDER BY due_date DESC LIMIT $2 OFFSET $3"
//! );
//! assert_eq!(query.bound_values().len(), 3);
//! ```

use std::fmt::Write as _;

use super::filter::{FilterBuilder, FilterClause, SqlValue};
use super::page::PageConfig;

/// Columns selected for every task row
pub const TASK_COLUMNS: &str = "id, title, description, status, priority, created_at, due_date";

/// Filterless total-count statement used for listing metadata
pub const COUNT_STATEMENT: &str = "SELECT COUNT(*) FROM tasks";

/// An assembled listing query
///
/// Besides the SQL text and bound values it keeps the clauses and page it
/// was built from, so backends without a SQL engine can evaluate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    statement: String,
    bound_values: Vec<SqlValue>,
    clauses: Vec<FilterClause>,
    page: PageConfig,
}

impl TaskQuery {
    /// Render the statement for the given filters and page
    pub fn assemble(filters: &FilterBuilder, page: &PageConfig) -> Self {
        let mut statement = format!("SELECT {} FROM tasks", TASK_COLUMNS);

        if !filters.is_empty() {
            let predicate = filters.fragments().collect::<Vec<_>>().join(" AND ");
            let _ = write!(statement, " WHERE {}", predicate);
        }

        let filter_count = filters.len();
        let _ = write!(
            statement,
            " ORDER BY {} {} LIMIT ${} OFFSET ${}",
            page.sort_by.as_column(),
            page.sort_order.as_sql(),
            filter_count + 1,
            filter_count + 2
        );

        let mut bound_values: Vec<SqlValue> = filters.values().cloned().collect();
        bound_values.push(SqlValue::Integer(clamp_i64(page.limit)));
        bound_values.push(SqlValue::Integer(clamp_i64(page.offset)));

        Self {
            statement,
            bound_values,
            clauses: filters.clauses().to_vec(),
            page: *page,
        }
    }

    /// The parameterized SQL text
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Values for `$1..$n`, in placeholder order
    pub fn bound_values(&self) -> &[SqlValue] {
        &self.bound_values
    }

    /// Filter clauses the statement was built from
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Page configuration the statement was built from
    pub fn page(&self) -> &PageConfig {
        &self.page
    }
}

// Postgres has no unsigned integers; anything past i64::MAX selects nothing anyway.
fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
