//! Worker configuration

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::debug;

use super::error::WorkerError;

/// Per-worker iteration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of work iterations (and notifications) per worker
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Shortest pause before each notification, in milliseconds
    #[serde(rename = "pause-min-ms", default = "default_pause_min_ms")]
    pub pause_min_ms: u64,

    /// Longest pause before each notification, in milliseconds
    #[serde(rename = "pause-max-ms", default = "default_pause_max_ms")]
    pub pause_max_ms: u64,
}

/// Upper bound for either pause setting (one minute)
pub const MAX_PAUSE_MS: u64 = 60_000;

fn default_iterations() -> u32 {
    10
}

fn default_pause_min_ms() -> u64 {
    2
}

fn default_pause_max_ms() -> u64 {
    20
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            pause_min_ms: default_pause_min_ms(),
            pause_max_ms: default_pause_max_ms(),
        }
    }
}

impl WorkerConfig {
    /// Reject settings a worker cannot run with
    pub fn validate(&self) -> Result<(), WorkerError> {
        debug!(?self, "WorkerConfig::validate: called");
        if self.iterations == 0 {
            return Err(WorkerError::InvalidConfig("iterations must be at least 1".to_string()));
        }
        if self.pause_min_ms > self.pause_max_ms {
            return Err(WorkerError::InvalidConfig(format!(
                "pause-min-ms ({}) is greater than pause-max-ms ({})",
                self.pause_min_ms, self.pause_max_ms
            )));
        }
        if self.pause_max_ms > MAX_PAUSE_MS {
            return Err(WorkerError::InvalidConfig(format!(
                "pause-max-ms ({}) exceeds the {} ms limit",
                self.pause_max_ms, MAX_PAUSE_MS
            )));
        }
        Ok(())
    }

    /// Pause range in microseconds, the granularity pauses are drawn at
    pub fn pause_range_us(&self) -> RangeInclusive<u64> {
        self.pause_min_ms.saturating_mul(1000)..=self.pause_max_ms.saturating_mul(1000)
    }

    /// Longest time one worker can spend pausing over all its iterations
    pub fn max_run_time(&self) -> Duration {
        Duration::from_millis(self.pause_max_ms.saturating_mul(u64::from(self.iterations)))
    }
}
