//! Core task operations
//!
//! [`TaskService`] takes already-parsed values, validates them, and talks
//! to a [`TaskStore`]. It never sees raw requests and knows nothing about
//! HTTP. Every failure comes back as one [`Error`]:
//!
//! - validation problems before any storage call
//! - [`Error::NotFound`] when the target id does not exist
//! - [`Error::Storage`] for any other storage failure, never retried here
//!
//! Get, delete and update each take two storage round trips (check or read,
//! then act) without a transaction. A concurrent writer between the two can
//! be overwritten, and a concurrent delete can turn an existence check into
//! a stale answer.

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::model::{NewTask, Task, TaskUpdate};
use crate::query::{FilterBuilder, PageConfig, SortField, SortOrder, TaskQuery};
use crate::storage::{StorageError, TaskStore};
use crate::validation::{validate_new_task, validate_update};

/// Offset, limit and total for a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub offset: u64,
    pub limit: u64,
    /// Filterless count; absent when counting failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tasks: Option<u64>,
}

/// Ordering applied to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortingInfo {
    pub by: SortField,
    pub order: SortOrder,
}

/// One page of a task listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub pagination: PaginationInfo,
    pub sorting: SortingInfo,
}

/// Task operations over a storage backend
#[derive(Debug, Clone)]
pub struct TaskService<S> {
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The storage backend
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and insert a new task, returning its id
    #[instrument(skip(self, new_task))]
    pub async fn create(&self, new_task: NewTask) -> Result<u64> {
        validate_new_task(&new_task)?;
        let task = new_task.into_task(Utc::now())?;

        let id = self.store.insert(&task).await?;
        tracing::info!(task_id = id, "Task created");
        Ok(id)
    }

    /// Fetch one task after checking it exists
    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Task> {
        self.ensure_exists(id).await?;
        self.store.find_by_id(id).await.map_err(|e| not_found_or_storage(e, id))
    }

    /// Merge `update` into the stored task and persist the result.
    ///
    /// Returns the merged task. A write that touches no rows (the task was
    /// deleted after it was read) is not an error.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: u64, update: TaskUpdate) -> Result<Task> {
        validate_update(&update)?;
        let patch = update.into_patch()?;

        let current = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| not_found_or_storage(e, id))?;
        let merged = patch.apply_to(current);

        let affected = self.store.update(&merged).await?;
        if affected == 0 {
            tracing::debug!(task_id = id, "Update affected no rows");
        } else {
            tracing::info!(task_id = id, "Task updated");
        }
        Ok(merged)
    }

    /// Hard-delete a task after checking it exists
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.ensure_exists(id).await?;
        self.store.delete(id).await?;
        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Run a filtered, sorted, paginated listing.
    ///
    /// The total count is best effort: if it fails the page is still
    /// returned, only without `total_tasks`.
    #[instrument(skip(self, filters), fields(filters = filters.len()))]
    pub async fn list(&self, filters: &FilterBuilder, page: &PageConfig) -> Result<TaskPage> {
        let query = TaskQuery::assemble(filters, page);
        tracing::debug!(statement = query.statement(), "Assembled listing query");

        let tasks = self.store.query(&query).await?;

        let total_tasks = match self.store.count_all().await {
            Ok(total) => Some(total),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to count tasks, omitting total");
                None
            }
        };

        Ok(TaskPage {
            tasks,
            pagination: PaginationInfo {
                offset: page.offset,
                limit: page.limit,
                total_tasks,
            },
            sorting: SortingInfo {
                by: page.sort_by,
                order: page.sort_order,
            },
        })
    }

    /// Existence check; a storage error here is a storage failure, never
    /// "not found".
    async fn ensure_exists(&self, id: u64) -> Result<()> {
        if self.store.exists(id).await? {
            Ok(())
        } else {
            Err(Error::NotFound(id))
        }
    }
}

fn not_found_or_storage(err: StorageError, id: u64) -> Error {
    if err.is_not_found() {
        Error::NotFound(id)
    } else {
        Error::Storage(err)
    }
}
