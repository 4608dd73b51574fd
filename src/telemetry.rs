//! Tracing bootstrap for the scoring pipeline. Resolver and propagation
//! failures are reported through `tracing`, so embedding binaries should
//! install the subscriber before the first save lands.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    InvalidFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("tracing subscriber already installed")]
    AlreadyInstalled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level so verbosity can be raised per target without touching
/// `VAULT_LOG_LEVEL`.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config)?)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

fn log_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidFilter {
                value: config.log_level.clone(),
                source,
            })
        }
    }
}
