// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up diagnostics output for the facade itself using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable.
/// Defaults to "info" if `RUST_LOG` is not set.
///
/// This is separate from the loggers the facade hands out: those write
/// through their own sinks and are not affected by `RUST_LOG`.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")); // Default to INFO level

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    tracing::debug!("Diagnostics logging setup complete.");
}
