//! Configuration for sms-filter

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FilterError, Result};

/// Prefix for environment overrides, e.g. `SMS_FILTER__THRESHOLDS__LOWER_SCORE=9`
pub const ENV_PREFIX: &str = "SMS_FILTER";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub thresholds: ThresholdConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Decision thresholds used by the classifier
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Keyword score at which a message becomes ambiguous
    pub lower_score: u32,
    /// Keyword score at which a message is spam outright
    pub higher_score: u32,
    /// Match percent at which a message becomes ambiguous
    pub match_low: f64,
    /// Match percent above which a message is spam
    pub match_high: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            lower_score: 10,
            higher_score: 12,
            match_low: 0.8,
            match_high: 0.9,
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lower_score > self.higher_score {
            return Err(FilterError::Config(format!(
                "lower_score ({}) must not exceed higher_score ({})",
                self.lower_score, self.higher_score
            )));
        }

        if !(0.0..=1.0).contains(&self.match_low) || !(0.0..=1.0).contains(&self.match_high) {
            return Err(FilterError::Config(
                "match thresholds must be within [0, 1]".to_string(),
            ));
        }

        if self.match_low > self.match_high {
            return Err(FilterError::Config(format!(
                "match_low ({}) must not exceed match_high ({})",
                self.match_low, self.match_high
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the collection files
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// One of "pretty", "json" or "compact"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl FilterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FilterError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| FilterError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: defaults, then an optional TOML file, then
    /// `SMS_FILTER__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| FilterError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }
}
