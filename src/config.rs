//! Pipeline configuration, loaded from TOML

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};
use crate::smoothing::DEFAULT_WINDOW_SIZE;

pub const DEFAULT_MAX_LENGTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Moving-average window, in points
    pub window_size: usize,
    /// Rows in every feature matrix
    pub max_length: usize,
    /// Run the smoother before encoding
    pub smoothing: bool,
    /// Worker threads for batch runs (None = one per core)
    pub threads: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            max_length: DEFAULT_MAX_LENGTH,
            smoothing: true,
            threads: None,
        }
    }
}

impl PipelineConfig {
    /// Raw paths straight into the encoder.
    pub fn unsmoothed() -> Self {
        PipelineConfig { smoothing: false, ..Default::default() }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| FeatureError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FeatureError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(FeatureError::Config("window_size must be at least 1".to_string()));
        }
        if self.max_length == 0 {
            return Err(FeatureError::Config("max_length must be at least 1".to_string()));
        }
        if self.threads == Some(0) {
            return Err(FeatureError::Config("threads must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}
