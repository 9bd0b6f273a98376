//! Structured logging with tracing

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the configured level is
/// used. Returns an error if a subscriber is already installed.
pub fn init_tracing(
    config: &LoggingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "pretty" {
        builder.pretty().finish().try_init()
    } else {
        builder.compact().finish().try_init()
    }
}
