//! Tracing subscriber setup for binaries built on the workspace.

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::constants::BOOTSTRAP_LOG_FILTER;
use crate::error::{CoreError, CoreResult};

pub type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

/// ## Summary
/// Installs the global subscriber with a reloadable filter starting at the bootstrap level.
///
/// Log lines go to stderr so binaries can keep stdout for their output.
///
/// ## Errors
/// Returns `CoreError::ConfigError` if a global subscriber is already installed.
pub fn init_tracing() -> CoreResult<LogFilterHandle> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new(BOOTSTRAP_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|err| CoreError::ConfigError(format!("tracing subscriber: {err}")))?;

    Ok(filter_handle)
}

/// ## Summary
/// Swaps the bootstrap filter for the configured level, keeping the old one if it does not parse.
pub fn apply_log_level(handle: &LogFilterHandle, config: &LoggingConfig) {
    if let Ok(filter) = EnvFilter::try_new(config.level.as_str()) {
        if let Err(e) = handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.level, "Invalid log level in config, keeping bootstrap filter");
    }
}
