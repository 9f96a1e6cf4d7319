//! Logging system setup
//!
//! The index itself only emits `tracing` events. Embedding applications that
//! have no subscriber of their own can install one here.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;
use crate::error::{LoggingError, LoggingResult};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. Fails if a global subscriber
/// has already been installed.
pub fn setup_logging(settings: &LoggingSettings) -> LoggingResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let result = if settings.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(false))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init()
    };

    result.map_err(LoggingError::from)
}
