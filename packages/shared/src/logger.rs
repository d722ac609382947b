//! Logging setup utilities for the Chitchat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The default filter targets the calling binary's crate (its library
/// shares the same normalized name). The filter can be overridden with
/// the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "chitchat-server")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use chitchat_shared::logger::setup_logger;
///
/// setup_logger("chitchat-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the default filter directive for the given binary.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!("{}={}", binary_name.replace("-", "_"), default_log_level)
}
