//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    service::TaskService,
    storage::{MemoryTaskStore, TaskBackend},
};

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    tasks: Arc<TaskService<TaskBackend>>,
}

impl AppState {
    /// Create state over an already chosen backend
    pub fn new(config: Config, backend: TaskBackend) -> Self {
        Self {
            config: Arc::new(config),
            tasks: Arc::new(TaskService::new(backend)),
        }
    }

    /// Create a builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Task operations
    pub fn tasks(&self) -> &TaskService<TaskBackend> {
        &self.tasks
    }
}

/// Builder for AppState
#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    backend: Option<TaskBackend>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this backend instead of the one the config describes
    pub fn backend(mut self, backend: TaskBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Build the AppState, connecting to the database if one is configured
    ///
    /// Without a `[database]` table the in-memory store is used. A
    /// configured database that cannot be reached fails the build after
    /// the configured retries.
    pub async fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();

        let backend = match self.backend {
            Some(backend) => backend,
            None => Self::backend_from_config(&config).await?,
        };
        tracing::info!(backend = backend.name(), "Task storage ready");

        Ok(AppState::new(config, backend))
    }

    #[cfg(feature = "database")]
    async fn backend_from_config(config: &Config) -> Result<TaskBackend> {
        match &config.database {
            Some(db_config) => {
                let pool = crate::database::create_pool(db_config).await?;
                Ok(TaskBackend::Postgres(crate::storage::PgTaskStore::new(pool)))
            }
            None => {
                tracing::warn!("No database configured, tasks are kept in memory and lost on restart");
                Ok(TaskBackend::Memory(MemoryTaskStore::new()))
            }
        }
    }

    #[cfg(not(feature = "database"))]
    async fn backend_from_config(config: &Config) -> Result<TaskBackend> {
        if config.database.is_some() {
            tracing::warn!("Database configured but the `database` feature is disabled, ignoring it");
        }
        tracing::warn!("Tasks are kept in memory and lost on restart");
        Ok(TaskBackend::Memory(MemoryTaskStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_without_database_uses_memory() {
        let state = AppState::builder().build().await.unwrap();
        assert_eq!(state.tasks().store().name(), "memory");
        assert_eq!(state.config().service.port, 8080);
    }

    #[tokio::test]
    async fn test_builder_keeps_explicit_backend() {
        let backend = TaskBackend::Memory(MemoryTaskStore::new());
        let mut config = Config::default();
        config.service.name = "custom".to_string();

        let state = AppState::builder()
            .config(config)
            .backend(backend)
            .build()
            .await
            .unwrap();
        assert_eq!(state.config().service.name, "custom");
    }
}
