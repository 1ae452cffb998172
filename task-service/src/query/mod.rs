//! Listing query construction
//!
//! - [`FilterBuilder`] turns named filter inputs into ordered clauses
//! - [`PageConfig`] resolves offset, limit and ordering
//! - [`TaskQuery`] renders both into one parameterized statement

pub mod assembler;
pub mod filter;
pub mod page;

pub use assembler::{TaskQuery, COUNT_STATEMENT, TASK_COLUMNS};
pub use filter::{FilterBuilder, FilterClause, FilterField, FilterOperator, FilterParams, SqlValue};
pub use page::{PageConfig, PageParams, SortField, SortOrder, DEFAULT_LIMIT, SORTABLE_FIELDS};
