use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failure_rate must be within [0, 1], got {0}")]
    FailureRate(f64),

    #[error("export_scale must be at least 1")]
    ExportScale,
}

/// Tunables of the simulated flow. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub submit_latency_ms: u64,
    /// Probability that a submission fails with `SERVICE_UNAVAILABLE`.
    pub failure_rate: f64,
    pub accounts_latency_ms: u64,
    pub beneficiaries_latency_ms: u64,
    pub export_dir: PathBuf,
    pub export_scale: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submit_latency_ms: 1500,
            failure_rate: 0.15,
            accounts_latency_ms: 600,
            beneficiaries_latency_ms: 400,
            export_dir: PathBuf::from("."),
            export_scale: 2,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::FailureRate(self.failure_rate));
        }
        if self.export_scale == 0 {
            return Err(ConfigError::ExportScale);
        }
        Ok(())
    }

    pub fn submit_latency(&self) -> Duration {
        Duration::from_millis(self.submit_latency_ms)
    }

    pub fn accounts_latency(&self) -> Duration {
        Duration::from_millis(self.accounts_latency_ms)
    }

    pub fn beneficiaries_latency(&self) -> Duration {
        Duration::from_millis(self.beneficiaries_latency_ms)
    }
}
