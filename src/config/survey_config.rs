//! Survey Configuration - calculation constants as operator-tunable TOML values
//!
//! Each struct implements `Default` with the standard field values, ensuring
//! zero-change behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::types::CalculationMethod;

/// Configuration load/validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Root configuration for survey calculations.
///
/// Load with `SurveyConfig::load()` which searches:
/// 1. `$WELLPATH_CONFIG` env var
/// 2. `./survey_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Station lifecycle defaults
    #[serde(default)]
    pub station: StationConfig,

    /// Calculation tuning constants
    #[serde(default)]
    pub calculation: CalculationConfig,

    /// Presentation-boundary rounding
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Defaults applied when a caller appends a new station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    /// Measured-depth increment for a default new station (length units)
    #[serde(default = "defaults::md_increment")]
    pub md_increment: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            md_increment: defaults::md_increment(),
        }
    }
}

/// Calculation tuning constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Dogleg severity normalization interval (length units per DLS unit,
    /// conventionally 100 ft → degrees per 100 ft)
    #[serde(default = "defaults::dls_interval")]
    pub dls_interval: f64,

    /// Calculation method used when the caller does not select one
    #[serde(default)]
    pub default_method: CalculationMethod,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            dls_interval: defaults::dls_interval(),
            default_method: CalculationMethod::default(),
        }
    }
}

/// Presentation-boundary rounding. Internal computation never rounds — only
/// output formatting does, so rounding error cannot compound along a cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places for derived values at the presentation boundary
    #[serde(default = "defaults::precision")]
    pub precision: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: defaults::precision(),
        }
    }
}

mod defaults {
    pub fn md_increment() -> f64 {
        100.0
    }
    pub fn dls_interval() -> f64 {
        100.0
    }
    pub fn precision() -> u32 {
        2
    }
}

impl SurveyConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WELLPATH_CONFIG` environment variable
    /// 2. `./survey_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var("WELLPATH_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded survey config from WELLPATH_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from WELLPATH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "WELLPATH_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./survey_config.toml
        let local = PathBuf::from("survey_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded survey config from ./survey_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./survey_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No survey_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would corrupt geometry (non-positive intervals,
    /// absurd precision).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.station.md_increment.is_finite() || self.station.md_increment <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "station.md_increment must be a positive finite number, got {}",
                self.station.md_increment
            )));
        }
        if !self.calculation.dls_interval.is_finite() || self.calculation.dls_interval <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "calculation.dls_interval must be a positive finite number, got {}",
                self.calculation.dls_interval
            )));
        }
        if self.display.precision > 6 {
            return Err(ConfigError::Invalid(format!(
                "display.precision must be at most 6, got {}",
                self.display.precision
            )));
        }
        Ok(())
    }
}
