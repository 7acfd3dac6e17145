//! Structured logging setup
//!
//! Installs a global `tracing-subscriber` fmt subscriber from a [`LoggingConfig`].
//! `RUST_LOG`, when set, takes precedence over the configured level.

use crate::config::LoggingConfig;
use crate::error::{CodecError, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Build the filter used by [`init_logging`]
pub fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_ascii_lowercase()))
}

/// Install the global subscriber
///
/// # Errors
/// Returns `CodecError::ConfigError` if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(config))
        .with_target(true);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| {
        CodecError::ConfigError(format!("Failed to install tracing subscriber: {e}"))
    })?;

    info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}
