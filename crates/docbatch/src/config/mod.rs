pub mod loader;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use loader::{load_engine_config, load_engine_config_from_str, ConfigFormat};

/// Upper bound for the retry backoff.
pub const MAX_RETRY_BACKOFF_MS: u64 = 5000;

/// Upper bound for `maxConcurrentJobs`.
pub const MAX_CONCURRENT_JOBS: usize = 1024;

/// Upper bound for `eventCapacity`; the event buffer is allocated up front.
pub const MAX_EVENT_CAPACITY: usize = 65_536;

/// Runtime settings of a [`BatchEngine`](crate::engine::BatchEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_max_concurrent_files")]
    pub max_concurrent_files: usize,

    /// Engine-wide bound on running drain loops; `None` is unbounded.
    #[serde(default)]
    pub max_concurrent_jobs: Option<usize>,

    #[serde(default)]
    pub step_timeout_secs: Option<u64>,

    #[serde(default)]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_max_concurrent_files() -> usize {
    2
}

fn default_event_capacity() -> usize {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: default_max_concurrent_files(),
            max_concurrent_jobs: None,
            step_timeout_secs: None,
            retry_backoff_ms: 0,
            event_capacity: default_event_capacity(),
        }
    }
}

impl EngineConfig {
    pub fn with_max_concurrent_files(mut self, max: usize) -> Self {
        self.max_concurrent_files = max;
        self
    }

    pub fn with_max_concurrent_jobs(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = Some(max);
        self
    }

    pub fn with_step_timeout_secs(mut self, secs: u64) -> Self {
        self.step_timeout_secs = Some(secs);
        self
    }

    pub fn with_retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }

    /// Backoff before a retry, capped at [`MAX_RETRY_BACKOFF_MS`].
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.min(MAX_RETRY_BACKOFF_MS))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_files == 0 {
            return Err(ConfigError::Validation {
                message: "maxConcurrentFiles must be at least 1".to_string(),
            });
        }

        match self.max_concurrent_jobs {
            Some(0) => {
                return Err(ConfigError::Validation {
                    message: "maxConcurrentJobs must be at least 1 when set".to_string(),
                });
            }
            Some(max) if max > MAX_CONCURRENT_JOBS => {
                return Err(ConfigError::Validation {
                    message: format!("maxConcurrentJobs must be at most {}", MAX_CONCURRENT_JOBS),
                });
            }
            _ => {}
        }

        if self.step_timeout_secs == Some(0) {
            return Err(ConfigError::Validation {
                message: "stepTimeoutSecs must be at least 1 when set".to_string(),
            });
        }

        if self.event_capacity == 0 {
            return Err(ConfigError::Validation {
                message: "eventCapacity must be at least 1".to_string(),
            });
        }

        if self.event_capacity > MAX_EVENT_CAPACITY {
            return Err(ConfigError::Validation {
                message: format!("eventCapacity must be at most {}", MAX_EVENT_CAPACITY),
            });
        }

        Ok(())
    }
}
