//! Database connection pool management

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::{
    config::DatabaseConfig,
    error::Result,
    storage::{StorageError, StorageOperation},
};

/// Create a PostgreSQL connection pool, retrying with exponential backoff
///
/// Makes up to `max_retries + 1` attempts. The delay starts at
/// `retry_delay_secs` and doubles after each failure.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let mut attempt: u32 = 0;
    let base_delay = Duration::from_secs(config.retry_delay_secs);

    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                if attempt > 0 {
                    tracing::info!(
                        "Database connection established after {} attempt(s)",
                        attempt + 1
                    );
                } else {
                    tracing::info!(
                        "Database connection pool created: max={}, min={}",
                        config.max_connections,
                        config.min_connections
                    );
                }
                return Ok(pool);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries {
                    tracing::error!(
                        "Failed to connect to database after {} attempts: {}",
                        attempt,
                        e
                    );
                    return Err(e.into());
                }

                let delay = backoff_delay(base_delay, attempt);
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based)
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
}

async fn try_create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, StorageError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| {
            StorageError::connection_failed(
                StorageOperation::Connect,
                format!(
                    "failed to connect to '{}' ({}): {}",
                    sanitize_connection_url(&config.url),
                    categorize_db_error(&e),
                    e
                ),
            )
        })
}

/// Mask the password of a connection URL for logging
fn sanitize_connection_url(url: &str) -> String {
    if let (Some(scheme_end), Some(at_pos)) = (url.find("://"), url.rfind('@')) {
        let credentials_start = scheme_end + 3;
        if credentials_start < at_pos {
            if let Some(colon) = url[credentials_start..at_pos].find(':') {
                let username = &url[credentials_start..credentials_start + colon];
                return format!("{}{}:***{}", &url[..credentials_start], username, &url[at_pos..]);
            }
        }
    }
    url.to_string()
}

fn categorize_db_error(err: &sqlx::Error) -> &'static str {
    use sqlx::Error;
    match err {
        Error::Configuration(_) => "configuration error",
        Error::Database(_) => "database rejected the connection",
        Error::Io(_) => "network I/O error",
        Error::Tls(_) => "TLS error",
        Error::PoolTimedOut => "connection pool timeout",
        Error::PoolClosed => "connection pool closed",
        _ => "connection error",
    }
}
