//! Configuration management for repoprobe
//!
//! Settings load from `REPOPROBE_*` environment variables with sensible
//! defaults:
//!
//! - `REPOPROBE_CACHE_ENABLED`: enable result caching (true|false) - default "true"
//! - `REPOPROBE_CACHE_DIR`: cache directory - default platform cache dir + "repoprobe"
//! - `REPOPROBE_PROBE_TIMEOUT`: toolchain probe timeout in seconds - default "5"
//! - `REPOPROBE_CONFIDENCE_THRESHOLD`: low-confidence probe threshold - default "0.3"
//! - `REPOPROBE_MAX_FILES`: source-file sampling cap - default "20"
//! - `REPOPROBE_LOG_LEVEL`: logging level - default "info"

use crate::cache::DetectionCache;
use crate::detection::DetectionOptions;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CACHE_ENABLED: bool = true;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.3;
const DEFAULT_MAX_FILES: usize = 20;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub cache_enabled: bool,
    pub cache_dir: PathBuf,
    pub probe_timeout: Duration,
    pub confidence_threshold: f64,
    pub max_files_to_analyze: usize,
    pub log_level: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let cache_enabled = env::var("REPOPROBE_CACHE_ENABLED")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_CACHE_ENABLED);

        let cache_dir = env::var("REPOPROBE_CACHE_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(DetectionCache::default_dir);

        let probe_timeout = env::var("REPOPROBE_PROBE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS));

        let confidence_threshold = env::var("REPOPROBE_CONFIDENCE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);

        let max_files_to_analyze = env::var("REPOPROBE_MAX_FILES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_FILES);

        let log_level = env::var("REPOPROBE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            cache_enabled,
            cache_dir,
            probe_timeout,
            confidence_threshold,
            max_files_to_analyze,
            log_level,
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::ValidationFailed(format!(
                "confidence threshold must be in [0,1], got {}",
                self.confidence_threshold
            )));
        }
        if self.max_files_to_analyze == 0 {
            return Err(ConfigError::ValidationFailed(
                "max files to analyze must be positive".to_string(),
            ));
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "probe timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Detection options carrying this configuration's tunables.
    pub fn detection_options(&self) -> DetectionOptions {
        DetectionOptions {
            cache_enabled: self.cache_enabled,
            confidence_threshold: self.confidence_threshold,
            include_dev_files: false,
            max_files_to_analyze: self.max_files_to_analyze,
        }
    }
}
