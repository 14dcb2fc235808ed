//! Configuration management for the entity graph analyzer

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration for neighborhood coloring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of distinct colors; community ids wrap around this
    pub palette_size: usize,

    /// Seed for the community detection node-visit order
    pub seed: u64,

    /// Modularity resolution (higher values favour smaller communities)
    pub resolution: f64,

    /// A Louvain level stops once its modularity gain falls below this
    pub min_modularity_gain: f64,

    /// Optional cap on local-moving sweeps across all levels
    pub max_passes: Option<usize>,

    /// Optional wall-clock budget for community detection, in milliseconds
    pub time_budget_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette_size: 20,
            seed: 42,
            resolution: 1.0,
            min_modularity_gain: 1e-7,
            max_passes: None,
            time_budget_ms: None,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(palette_size: usize, seed: u64, resolution: f64) -> Self {
        Self {
            palette_size,
            seed,
            resolution,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read config {}: {}", path.display(), e))?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the coloring step cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.palette_size == 0 {
            return Err(GraphError::Config("palette_size must be at least 1".into()));
        }
        if !(self.resolution > 0.0) || !self.resolution.is_finite() {
            return Err(GraphError::Config(format!(
                "resolution must be a positive number, got {}",
                self.resolution
            )));
        }
        if !(self.min_modularity_gain >= 0.0) {
            return Err(GraphError::Config(
                "min_modularity_gain must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Time budget as a duration, if one is configured
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}
