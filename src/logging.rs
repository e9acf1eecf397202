//! Logging setup for the command-line binary.
//!
//! Output goes to stderr so stdout stays clean for the report. The level
//! defaults to `info` and follows `RUST_LOG` when set. Library code only emits
//! events; installing a subscriber is left to the binary.

use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_logging() -> Result<(), TryInitError> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
}
