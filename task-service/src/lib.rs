//! # task-service
//!
//! Task-tracking backend: create, fetch, update, delete and list tasks
//! stored in PostgreSQL (or in memory for development).
//!
//! The interesting parts are the listing engine and the update merge:
//!
//! - [`query::FilterBuilder`] turns named filters into ordered clauses
//! - [`query::PageConfig`] resolves offset, limit and ordering
//! - [`query::TaskQuery`] renders both into one parameterized statement
//! - [`service::TaskService::update`] overlays only the fields a client sent
//!
//! Everything HTTP-shaped lives in [`handlers`] and [`server`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use task_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config);
//!
//!     let state = AppState::builder()
//!         .config(config.clone())
//!         .build()
//!         .await?;
//!
//!     Server::new(config)
//!         .serve(create_router(state))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
#[cfg(feature = "database")]
pub mod database;
pub mod error;
pub mod handlers;
pub mod model;
pub mod observability;
pub mod query;
pub mod server;
pub mod service;
pub mod state;
pub mod storage;
pub mod validation;

/// Commonly used types and functions
pub mod prelude {
    pub use crate::config::{Config, DatabaseConfig, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::handlers::create_router;
    pub use crate::model::{NewTask, Task, TaskUpdate};
    pub use crate::observability::init_tracing;
    pub use crate::query::{FilterBuilder, PageConfig, SortField, SortOrder, TaskQuery};
    pub use crate::server::Server;
    pub use crate::service::{TaskPage, TaskService};
    pub use crate::state::AppState;
    pub use crate::storage::{MemoryTaskStore, TaskBackend, TaskStore};
    pub use crate::validation::ValidationError;

    #[cfg(feature = "database")]
    pub use crate::storage::PgTaskStore;
}
