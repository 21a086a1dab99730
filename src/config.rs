//! Scheduler configuration.
//!
//! Centralizes the tunable values of the scheduler and the progress analyzer.
//! Values are resolved with priority: config.toml > .env / environment > default.

use serde::Deserialize;
use std::path::Path;

use crate::error::{LeitnerError, Result};

// ==================== Defaults ====================

/// Bucket that represents mastery; items there are never promoted further
pub const DEFAULT_RETIRED_BUCKET: u32 = 5;

/// How far back (in days) a latest review may be to count as a recent improvement
pub const IMPROVEMENT_WINDOW_DAYS: i64 = 7;

/// Longest accepted improvement window (100 years)
pub const MAX_IMPROVEMENT_WINDOW_DAYS: i64 = 36_500;

/// Limit for the hardest-items list
pub const DIFFICULT_CARDS_LIMIT: usize = 5;

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the retired bucket
pub const RETIRED_BUCKET_ENV: &str = "LEITNER_RETIRED_BUCKET";

// ==================== Config structs ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct ConfigFile {
    scheduler: Option<SchedulerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub retired_bucket: u32,
    pub improvement_window_days: i64,
    pub difficult_cards_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            retired_bucket: DEFAULT_RETIRED_BUCKET,
            improvement_window_days: IMPROVEMENT_WINDOW_DAYS,
            difficult_cards_limit: DIFFICULT_CARDS_LIMIT,
        }
    }
}

impl SchedulerConfig {
    /// Defaults with a different retired bucket
    pub fn with_retired_bucket(retired_bucket: u32) -> Self {
        Self {
            retired_bucket,
            ..Self::default()
        }
    }

    /// Reject values the analyzer cannot turn into a date window
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_IMPROVEMENT_WINDOW_DAYS).contains(&self.improvement_window_days) {
            return Err(LeitnerError::Config(format!(
                "improvement_window_days must be between 0 and {}, got {}",
                MAX_IMPROVEMENT_WINDOW_DAYS, self.improvement_window_days
            )));
        }
        Ok(())
    }
}

// ==================== Loading ====================

/// Load config with priority: config.toml > .env > default.
///
/// An unreadable or malformed config.toml is logged and skipped.
pub fn load_config() -> SchedulerConfig {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    match load_config_from(Path::new(CONFIG_FILE)) {
        Ok(Some(config)) => {
            tracing::info!(
                "Using scheduler config from {} (retired bucket {})",
                CONFIG_FILE,
                config.retired_bucket
            );
            return config;
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Ignoring {}: {}", CONFIG_FILE, e),
    }

    let env_value = std::env::var(RETIRED_BUCKET_ENV).ok();
    let config = config_from_env(env_value.as_deref());
    tracing::info!("Using retired bucket {}", config.retired_bucket);
    config
}

/// Read the `[scheduler]` table of a TOML file.
///
/// Returns `Ok(None)` if the file does not exist or has no `[scheduler]` table,
/// and a `Config` error if the table holds out-of-range values.
pub fn load_config_from(path: &Path) -> Result<Option<SchedulerConfig>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LeitnerError::Config(format!("{}: {}", path.display(), e))),
    };

    let file: ConfigFile = toml::from_str(&contents)
        .map_err(|e| LeitnerError::Config(format!("{}: {}", path.display(), e)))?;
    match file.scheduler {
        Some(config) => {
            config.validate().map_err(|e| match e {
                LeitnerError::Config(msg) => {
                    LeitnerError::Config(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Defaults, with the retired bucket taken from an env value when it parses
fn config_from_env(retired_bucket: Option<&str>) -> SchedulerConfig {
    match retired_bucket.map(|v| v.trim().parse::<u32>()) {
        Some(Ok(bucket)) => SchedulerConfig::with_retired_bucket(bucket),
        Some(Err(e)) => {
            tracing::warn!("Invalid {}: {}", RETIRED_BUCKET_ENV, e);
            SchedulerConfig::default()
        }
        None => SchedulerConfig::default(),
    }
}
