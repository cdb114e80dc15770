//! Logging setup utilities for the Sanmoku game server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the server library (`sanmoku_server`), this crate and
/// the binary itself. It can be overridden using the `RUST_LOG` environment
/// variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "sanmoku-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use sanmoku_shared::logger::setup_logger;
///
/// setup_logger("sanmoku-server", "debug");
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

/// Build the default `EnvFilter` directive string.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    [
        "sanmoku_server",
        env!("CARGO_PKG_NAME"),
        binary_name,
        "tower_http",
    ]
    .iter()
    .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
    .collect::<Vec<_>>()
    .join(",")
}
