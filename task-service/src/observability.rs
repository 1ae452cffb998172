//! Structured logging

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global JSON tracing subscriber.
///
/// `service.log_level` is read as an `EnvFilter` directive; an invalid
/// directive falls back to `info`. Calling this twice is harmless, the
/// second install is ignored.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            environment = %config.service.environment,
            "Tracing initialized for service: {}",
            config.service.name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_does_not_panic() {
        let mut config = Config::default();
        config.service.log_level = "not a [valid directive".to_string();
        init_tracing(&config);
        init_tracing(&config);
    }
}
