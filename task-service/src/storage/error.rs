//! Storage error types
//!
//! Every backend reports failures as a [`StorageError`]: the storage
//! operation that was running, a coarse [`StorageErrorKind`] and a message.
//! The core only ever branches on [`StorageErrorKind::NotFound`]; all other
//! kinds are surfaced as storage failures.
//!
//! # Example
//!
//! ```rust
//! use task_service::storage::{StorageError, StorageErrorKind, StorageOperation};
//!
//! let error = StorageError::not_found(StorageOperation::FindById, 7);
//! assert!(error.is_not_found());
//! assert_eq!(error.kind, StorageErrorKind::NotFound);
//! ```

use std::fmt;

/// Storage operation being performed when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOperation {
    /// Establishing the connection pool
    Connect,
    /// Fetching a single task by id
    FindById,
    /// Running an assembled listing query
    FindAll,
    /// Counting every stored task
    Count,
    /// Checking whether a task id exists
    Exists,
    /// Inserting a new task
    Create,
    /// Overwriting a stored task
    Update,
    /// Removing a task (hard delete)
    Delete,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::FindById => write!(f, "find_by_id"),
            Self::FindAll => write!(f, "find_all"),
            Self::Count => write!(f, "count"),
            Self::Exists => write!(f, "exists"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of storage error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageErrorKind {
    /// No row with the requested id
    NotFound,
    /// Could not reach the database
    ConnectionFailed,
    /// Pool acquisition or query timed out
    Timeout,
    /// The database rejected the statement
    DatabaseError,
    /// A returned row could not be mapped into a task
    RowDecode,
    /// Other unclassified error
    Other,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::RowDecode => write!(f, "row_decode"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured storage error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    /// The operation being performed when the error occurred
    pub operation: StorageOperation,
    /// The category of error
    pub kind: StorageErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The task id involved, when there is one
    pub task_id: Option<u64>,
}

impl StorageError {
    /// Create a new storage error
    pub fn new(
        operation: StorageOperation,
        kind: StorageErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            task_id: None,
        }
    }

    /// Create a "no such row" error for the given task id
    pub fn not_found(operation: StorageOperation, task_id: u64) -> Self {
        Self {
            operation,
            kind: StorageErrorKind::NotFound,
            message: "Task not found".to_string(),
            task_id: Some(task_id),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: StorageOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StorageErrorKind::ConnectionFailed, message)
    }

    /// Create a database error
    ///
    /// # Example
    ///
    /// ```rust
    /// use task_service::storage::{StorageError, StorageOperation};
    ///
    /// let error = StorageError::database_error(StorageOperation::Create, "Syntax error in query");
    /// assert!(!error.is_not_found());
    /// ```
    pub fn database_error(operation: StorageOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StorageErrorKind::DatabaseError, message)
    }

    /// Create a row decoding error
    pub fn row_decode(operation: StorageOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StorageErrorKind::RowDecode, message)
    }

    /// Attach the task id involved
    #[must_use]
    pub fn with_task(mut self, task_id: u64) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Set the operation that caused the error
    ///
    /// Conversions from driver errors don't know which operation was running,
    /// so backends stamp it afterwards.
    #[must_use]
    pub fn with_operation(mut self, operation: StorageOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether this error means "no such row"
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            StorageErrorKind::ConnectionFailed | StorageErrorKind::Timeout
        )
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Storage {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(task_id) = self.task_id {
            write!(f, " [task: {}]", task_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {}

#[cfg(feature = "database")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error as E;
        // The caller overrides the operation with `with_operation`.
        let op = StorageOperation::FindAll;
        match err {
            E::RowNotFound => Self::new(op, StorageErrorKind::NotFound, "Row not found"),
            E::PoolTimedOut => Self::new(op, StorageErrorKind::Timeout, "Connection pool timed out"),
            E::PoolClosed => Self::connection_failed(op, "Connection pool is closed"),
            E::Io(e) => Self::connection_failed(op, e.to_string()),
            E::Tls(e) => Self::connection_failed(op, format!("TLS error: {}", e)),
            E::ColumnNotFound(col) => Self::row_decode(op, format!("Column not found: {}", col)),
            E::ColumnIndexOutOfBounds { index, len } => Self::row_decode(
                op,
                format!("Column index {} out of bounds (len: {})", index, len),
            ),
            E::ColumnDecode { index, source } => {
                Self::row_decode(op, format!("Failed to decode column {}: {}", index, source))
            }
            E::Decode(e) => Self::row_decode(op, e.to_string()),
            E::Database(e) => Self::database_error(op, e.to_string()),
            E::Protocol(msg) => Self::database_error(op, msg),
            other => Self::new(op, StorageErrorKind::Other, other.to_string()),
        }
    }
}
