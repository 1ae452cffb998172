//! PostgreSQL task store
//!
//! Expects the `tasks` table from `schema.sql`. Ids are `BIGINT` and
//! priorities `INTEGER` on the database side; both are range-checked when a
//! row is mapped back into a [`Task`], and a row that fails to map fails the
//! whole call.

use sqlx::{postgres::PgRow, PgPool, Row};

use super::{StorageError, StorageOperation, StorageResult, TaskStore};
use crate::model::Task;
use crate::query::{SqlValue, TaskQuery, COUNT_STATEMENT, TASK_COLUMNS};

/// `sqlx`-backed task storage
///
/// Cloning is cheap: `PgPool` is reference counted.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn at(operation: StorageOperation) -> impl Fn(sqlx::Error) -> StorageError {
    move |err| StorageError::from(err).with_operation(operation)
}

// Ids beyond i64::MAX can't exist in a BIGINT column.
fn db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

fn task_from_row(row: &PgRow) -> Result<Task, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let priority: i32 = row.try_get("priority")?;

    Ok(Task {
        id: u64::try_from(id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: row.try_get("status")?,
        priority: u16::try_from(priority).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        created_at: row.try_get("created_at")?,
        due_date: row.try_get("due_date")?,
    })
}

impl TaskStore for PgTaskStore {
    async fn insert(&self, task: &Task) -> StorageResult<u64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tasks (title, description, status, priority, created_at, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(i32::from(task.priority))
        .bind(task.created_at)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(at(StorageOperation::Create))?;

        u64::try_from(id).map_err(|_| {
            StorageError::row_decode(StorageOperation::Create, format!("negative id {}", id))
        })
    }

    async fn find_by_id(&self, id: u64) -> StorageResult<Task> {
        let not_found = || StorageError::not_found(StorageOperation::FindById, id);
        let db_id = db_id(id).ok_or_else(not_found)?;

        let row = sqlx::query(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(db_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(at(StorageOperation::FindById))?
            .ok_or_else(not_found)?;

        task_from_row(&row).map_err(|e| at(StorageOperation::FindById)(e).with_task(id))
    }

    async fn update(&self, task: &Task) -> StorageResult<u64> {
        let Some(db_id) = db_id(task.id) else {
            return Ok(0);
        };

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $1, description = $2, status = $3, priority = $4, due_date = $5
            WHERE id = $6
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(i32::from(task.priority))
        .bind(task.due_date)
        .bind(db_id)
        .execute(&self.pool)
        .await
        .map_err(|e| at(StorageOperation::Update)(e).with_task(task.id))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: u64) -> StorageResult<()> {
        let Some(db_id) = db_id(id) else {
            return Ok(());
        };

        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(db_id)
            .execute(&self.pool)
            .await
            .map_err(|e| at(StorageOperation::Delete)(e).with_task(id))?;

        Ok(())
    }

    async fn exists(&self, id: u64) -> StorageResult<bool> {
        let Some(db_id) = db_id(id) else {
            return Ok(false);
        };

        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
            .bind(db_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| at(StorageOperation::Exists)(e).with_task(id))
    }

    async fn query(&self, query: &TaskQuery) -> StorageResult<Vec<Task>> {
        tracing::debug!(
            statement = query.statement(),
            bound_values = query.bound_values().len(),
            "Running task query"
        );

        let mut statement = sqlx::query(query.statement());
        for value in query.bound_values() {
            statement = match value {
                SqlValue::Text(text) => statement.bind(text.as_str()),
                SqlValue::Integer(number) => statement.bind(*number),
            };
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(at(StorageOperation::FindAll))?;

        rows.iter()
            .map(task_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(at(StorageOperation::FindAll))
    }

    async fn count_all(&self) -> StorageResult<u64> {
        let count: i64 = sqlx::query_scalar(COUNT_STATEMENT)
            .fetch_one(&self.pool)
            .await
            .map_err(at(StorageOperation::Count))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
