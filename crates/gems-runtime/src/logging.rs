//! Tracing subscriber setup for hosts
//!
//! Library code only emits `tracing` events. A host that wants them on the
//! terminal calls `init_logging` once at startup.

use gems_core::{GemsError, GemsResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{LogConfig, LogFormat};

/// Build the filter: `RUST_LOG` if set, else the configured directive
pub fn build_filter(config: &LogConfig) -> GemsResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| GemsError::InvalidConfig(format!("log filter {:?}: {}", config.filter, e))),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> GemsResult<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(config.with_target))
            .try_init(),
    };

    result.map_err(|e| GemsError::InvalidConfig(format!("logging already initialised: {}", e)))
}
