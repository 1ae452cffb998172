//! Storage collaborator for tasks
//!
//! [`TaskStore`] is the only contract the core consumes. Two backends ship
//! with the crate:
//!
//! - [`PgTaskStore`]: PostgreSQL through `sqlx` (feature `database`)
//! - [`MemoryTaskStore`]: a process-local map, used when no database is
//!   configured and throughout the tests
//!
//! [`TaskBackend`] picks one of them at runtime.

pub mod error;
pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;

use std::future::Future;

pub use error::{StorageError, StorageErrorKind, StorageOperation};
pub use memory::MemoryTaskStore;
#[cfg(feature = "database")]
pub use postgres::PgTaskStore;

use crate::model::Task;
use crate::query::TaskQuery;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Persistence operations the core relies on
///
/// `find_by_id` reports a missing row as an error of kind
/// [`StorageErrorKind::NotFound`]; every other failure uses another kind.
pub trait TaskStore: Send + Sync {
    /// Insert a task and return its generated id.
    ///
    /// The `id` field of `task` is ignored.
    fn insert(&self, task: &Task) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Fetch a task by id
    fn find_by_id(&self, id: u64) -> impl Future<Output = StorageResult<Task>> + Send;

    /// Overwrite every mutable column of the row with `task.id`.
    ///
    /// Returns the number of rows affected; zero is not an error.
    fn update(&self, task: &Task) -> impl Future<Output = StorageResult<u64>> + Send;

    /// Hard-delete a task by id
    fn delete(&self, id: u64) -> impl Future<Output = StorageResult<()>> + Send;

    /// Whether a task with this id exists
    fn exists(&self, id: u64) -> impl Future<Output = StorageResult<bool>> + Send;

    /// Run an assembled listing query
    fn query(&self, query: &TaskQuery) -> impl Future<Output = StorageResult<Vec<Task>>> + Send;

    /// Count every stored task
    fn count_all(&self) -> impl Future<Output = StorageResult<u64>> + Send;
}

/// Runtime choice of storage backend
#[derive(Debug, Clone)]
pub enum TaskBackend {
    #[cfg(feature = "database")]
    Postgres(PgTaskStore),
    Memory(MemoryTaskStore),
}

impl TaskBackend {
    /// Short backend name for logs
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl TaskStore for TaskBackend {
    async fn insert(&self, task: &Task) -> StorageResult<u64> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(store) => store.insert(task).await,
            Self::Memory(store) => store.insert(task).await,
        }
    }

    async fn find_by_id(&self, id: u64) -> StorageResult<Task> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(store) => store.find_by_id(id).await,
            Self::Memory(store) => store.find_by_id(id).await,
        }
    }

    async fn update(&self, task: &Task) -> StorageResult<u64> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(store) => store.update(task).await,
            Self::Memory(store) => store.update(task).await,
        }
    }

    async fn delete(&self, id: u64) -> StorageResult<()> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(store) => store.delete(id).await,
            Self::Memory(store) => store.delete(id).await,
        }
    }

    async fn exists(&self, id: u64) -> StorageResult<bool> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(store) => store.exists(id).await,
            Self::Memory(store) => store.exists(id).await,
        }
    }

    async fn query(&self, query: &TaskQuery) -> StorageResult<Vec<Task>> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(store) => store.query(query).await,
            Self::Memory(store) => store.query(query).await,
        }
    }

    async fn count_all(&self) -> StorageResult<u64> {
        match self {
            #[cfg(feature = "database")]
            Self::Postgres(store) => store.count_all().await,
            Self::Memory(store) => store.count_all().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_delegates() {
        let backend = TaskBackend::Memory(MemoryTaskStore::new());
        assert_eq!(backend.name(), "memory");
        assert_eq!(backend.count_all().await.unwrap(), 0);
        assert!(!backend.exists(1).await.unwrap());
    }
}
