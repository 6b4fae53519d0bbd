//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

/// Serving configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Path to the model artifact JSON.
    pub model_path: PathBuf,
    pub port: u16,
    /// Concurrent prediction workers.
    pub workers: usize,
    /// Largest accepted batch request.
    pub max_batch_size: usize,
    /// Runner-up classes reported per prediction.
    pub max_alternatives: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/email_classifier.json"),
            port: 50055,
            workers: 10,
            max_batch_size: 1000,
            max_alternatives: 2,
        }
    }
}

impl ServiceConfig {
    /// Build config from `CATEGORIZER_*` environment variables.
    ///
    /// Unset variables take their defaults. Unparsable values are logged and
    /// also fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model_path = std::env::var("CATEGORIZER_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        Self {
            model_path,
            port: env_or("CATEGORIZER_PORT", defaults.port),
            workers: env_or("CATEGORIZER_WORKERS", defaults.workers).max(1),
            max_batch_size: env_or("CATEGORIZER_MAX_BATCH_SIZE", defaults.max_batch_size).max(1),
            max_alternatives: env_or("CATEGORIZER_MAX_ALTERNATIVES", defaults.max_alternatives),
        }
    }
}

fn env_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Invalid config value, using default");
            default
        }),
        Err(_) => default,
    }
}
