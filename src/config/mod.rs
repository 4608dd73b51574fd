use std::env;
use std::fmt;

use crate::progress::domain::Importance;

/// Top-level configuration for the scoring engine.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let scoring = ScoringConfig::from_env()?;
        let log_level = env::var("VAULT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            scoring,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Point values per importance level and the completion gate threshold.
///
/// Every write site derives `is_completed` through [`ScoringConfig::is_completed`]
/// so the gate lives in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    pub critical_points: u32,
    pub important_points: u32,
    pub optional_points: u32,
    pub completion_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            critical_points: 40,
            important_points: 30,
            optional_points: 10,
            completion_threshold: 80,
        }
    }
}

impl ScoringConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            critical_points: env_u32("VAULT_CRITICAL_POINTS", defaults.critical_points)?,
            important_points: env_u32("VAULT_IMPORTANT_POINTS", defaults.important_points)?,
            optional_points: env_u32("VAULT_OPTIONAL_POINTS", defaults.optional_points)?,
            completion_threshold: env_threshold(
                "VAULT_COMPLETION_THRESHOLD",
                defaults.completion_threshold,
            )?,
        })
    }

    pub fn points(&self, importance: Importance) -> u32 {
        match importance {
            Importance::Critical => self.critical_points,
            Importance::Important => self.important_points,
            Importance::Optional => self.optional_points,
        }
    }

    pub fn is_completed(&self, score: u8) -> bool {
        score >= self.completion_threshold
    }
}

fn env_u32(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPoints { key }),
        Err(_) => Ok(default),
    }
}

fn env_threshold(key: &'static str, default: u8) -> Result<u8, ConfigError> {
    let value = match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u8>()
            .map_err(|_| ConfigError::InvalidThreshold { key })?,
        Err(_) => default,
    };

    if value > 100 {
        return Err(ConfigError::InvalidThreshold { key });
    }

    Ok(value)
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPoints { key: &'static str },
    InvalidThreshold { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPoints { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::InvalidThreshold { key } => {
                write!(f, "{key} must be an integer in 0..=100")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
