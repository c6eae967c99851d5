//! Coordinator configuration

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Number of worker units to create
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Delay between entering the loop and launching the workers
    #[serde(rename = "launch-delay-ms", default = "default_launch_delay_ms")]
    pub launch_delay_ms: u64,

    /// Print progress lines to stdout
    #[serde(default = "default_echo")]
    pub echo: bool,
}

fn default_workers() -> u32 {
    debug!("default_workers: called");
    4
}

fn default_launch_delay_ms() -> u64 {
    debug!("default_launch_delay_ms: called");
    3000
}

fn default_echo() -> bool {
    true
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        debug!("CoordinatorConfig::default: called");
        Self {
            workers: 4,
            launch_delay_ms: 3000,
            echo: true,
        }
    }
}

impl CoordinatorConfig {
    /// Get the launch delay as a Duration
    pub fn launch_delay(&self) -> Duration {
        Duration::from_millis(self.launch_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(eyre!("coordinator.workers must be at least 1"));
        }
        Ok(())
    }
}
