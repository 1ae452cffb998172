//! In-memory task store
//!
//! Evaluates the structured clauses and page of a [`TaskQuery`] directly
//! instead of parsing its SQL. Used when no database is configured and as
//! the fixture backend in tests.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{StorageError, StorageErrorKind, StorageOperation, StorageResult, TaskStore};
use crate::model::Task;
use crate::query::{SortField, SortOrder, TaskQuery};

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<u64, Task>,
    next_id: u64,
}

/// Process-local task storage
///
/// Cloning is cheap and clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `tasks`, keeping their ids
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let rows: BTreeMap<u64, Task> = tasks.into_iter().map(|task| (task.id, task)).collect();
        let next_id = rows.keys().next_back().copied().unwrap_or(0);
        Self {
            inner: Arc::new(RwLock::new(Inner { rows, next_id })),
        }
    }
}

impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: &Task) -> StorageResult<u64> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id.checked_add(1).ok_or_else(|| {
            StorageError::new(
                StorageOperation::Create,
                StorageErrorKind::Other,
                "task id space exhausted",
            )
        })?;
        inner.next_id = id;
        inner.rows.insert(id, Task { id, ..task.clone() });
        Ok(id)
    }

    async fn find_by_id(&self, id: u64) -> StorageResult<Task> {
        self.inner
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(StorageOperation::FindById, id))
    }

    async fn update(&self, task: &Task) -> StorageResult<u64> {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&task.id) {
            Some(row) => {
                // created_at is fixed at creation
                *row = Task {
                    created_at: row.created_at,
                    ..task.clone()
                };
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: u64) -> StorageResult<()> {
        self.inner.write().await.rows.remove(&id);
        Ok(())
    }

    async fn exists(&self, id: u64) -> StorageResult<bool> {
        Ok(self.inner.read().await.rows.contains_key(&id))
    }

    async fn query(&self, query: &TaskQuery) -> StorageResult<Vec<Task>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<&Task> = inner
            .rows
            .values()
            .filter(|task| {
                query.clauses().iter().all(|clause| {
                    clause.matches(&task.title, &task.description, &task.status, task.priority)
                })
            })
            .collect();

        let page = query.page();
        matching.sort_by(|a, b| {
            let ordering = compare_by(page.sort_by, a, b);
            let ordering = match page.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_all(&self) -> StorageResult<u64> {
        Ok(self.inner.read().await.rows.len() as u64)
    }
}

fn compare_by(field: SortField, a: &Task, b: &Task) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Status => a.status.cmp(&b.status),
        SortField::Priority => a.priority.cmp(&b.priority),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::DueDate => a.due_date.cmp(&b.due_date),
    }
}
