//! maindispatch configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::coordinator::CoordinatorConfig;
use crate::worker::WorkerConfig;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR); CLI flag wins
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Worker count and launch timing
    pub coordinator: CoordinatorConfig,

    /// Per-worker iteration settings
    pub worker: WorkerConfig,
}

impl Config {
    /// Check the settings before building anything from them
    pub fn validate(&self) -> Result<()> {
        self.coordinator.validate()?;
        self.worker.validate()?;
        Ok(())
    }

    /// Load the configuration
    ///
    /// An explicit path must load. Otherwise the first readable file among
    /// [`Config::search_paths`] wins, and defaults apply when none does.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let found = Self::search_paths()
            .into_iter()
            .filter(|candidate| candidate.is_file())
            .find_map(|candidate| match Self::load_from_file(&candidate) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "Skipping unreadable config");
                    None
                }
            });

        Ok(found.unwrap_or_else(|| {
            tracing::info!("No config file found, using defaults");
            Self::default()
        }))
    }

    /// Implicit config locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".maindispatch.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("maindispatch").join("maindispatch.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
