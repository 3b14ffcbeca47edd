//! Tracing subscriber setup for host applications

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{FilterError, Result};

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if a global
/// subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| FilterError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.format.as_str() {
        "pretty" => builder.pretty().try_init(),
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        other => {
            return Err(FilterError::Config(format!(
                "Unknown log format '{}'",
                other
            )))
        }
    };

    installed.map_err(|e| FilterError::Config(format!("Failed to set tracing subscriber: {}", e)))
}
