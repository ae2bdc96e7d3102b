//! Serializable validation configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::degradation::FtSortMetric;

/// Knobs for the validation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Forward-test window length in calendar days (default 30).
    pub ft_days: i64,
    /// How many DSR-ranked trials survive the DSR filter (default 20).
    pub dsr_top_k: usize,
    /// Ordering of forward-test results (default: profit degradation).
    pub ft_sort_metric: FtSortMetric,
    /// Return periods per year, used to annualize Sharpe ratios in reports
    /// (default 12, monthly).
    pub periods_per_year: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ft_days: 30,
            dsr_top_k: 20,
            ft_sort_metric: FtSortMetric::ProfitDegradation,
            periods_per_year: 12,
        }
    }
}

/// Errors from loading a validation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ValidationConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    /// Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Deterministic identifier of this configuration.
    ///
    /// Two runs with identical settings share the same id, so reports can
    /// be grouped or cached by it.
    pub fn config_id(&self) -> String {
        let canonical = format!(
            "ft_days={};dsr_top_k={};ft_sort_metric={};periods_per_year={}",
            self.ft_days,
            self.dsr_top_k,
            self.ft_sort_metric.as_str(),
            self.periods_per_year
        );
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ft_days < 1 {
            return Err(ConfigError::Invalid(format!(
                "ft_days must be at least 1, got {}",
                self.ft_days
            )));
        }
        if self.dsr_top_k == 0 {
            return Err(ConfigError::Invalid("dsr_top_k must be at least 1".into()));
        }
        if self.periods_per_year == 0 {
            return Err(ConfigError::Invalid(
                "periods_per_year must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
