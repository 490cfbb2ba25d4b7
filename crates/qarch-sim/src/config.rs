//! Configuration management for Qarch simulation runs.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QARCH_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};

use qarch_builder::BuilderConfig;

use crate::error::ConfigError;

/// Hard ceiling on register size. 2^30 amplitudes is 16 GiB of state.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// State-vector engine settings
    #[serde(default)]
    pub simulator: SimConfig,

    /// Circuit builder settings
    #[serde(default)]
    pub builder: BuilderConfig,
}

/// State-vector engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Largest register the engine will allocate
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Allowed deviation of the squared norm from 1
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Check the norm after every gate
    #[serde(default = "default_true")]
    pub check_normalization: bool,
}

fn default_max_qubits() -> u32 {
    20
}

fn default_tolerance() -> f64 {
    1e-9
}

fn default_true() -> bool {
    true
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_qubits: default_max_qubits(),
            tolerance: default_tolerance(),
            check_normalization: true,
        }
    }
}

impl SimConfig {
    /// Override the qubit ceiling.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Effective ceiling, never above [`MAX_SUPPORTED_QUBITS`].
    pub fn qubit_limit(&self) -> u32 {
        self.max_qubits.min(MAX_SUPPORTED_QUBITS)
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_yaml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without validating it.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            Config::default()
        };

        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `QARCH_*` environment variables into this configuration.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides from `lookup`. Only keys it returns a value for
    /// change the configuration.
    pub fn merge_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("QARCH_MAX_QUBITS") {
            self.simulator.max_qubits = parse_var("QARCH_MAX_QUBITS", &v)?;
        }
        if let Some(v) = lookup("QARCH_TOLERANCE") {
            self.simulator.tolerance = parse_var("QARCH_TOLERANCE", &v)?;
        }
        if let Some(v) = lookup("QARCH_CHECK_NORMALIZATION") {
            self.simulator.check_normalization = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(ConfigError::Invalid(format!(
                        "QARCH_CHECK_NORMALIZATION: expected a boolean, got '{other}'"
                    )));
                }
            };
        }
        if let Some(v) = lookup("QARCH_LANE_TOLERANCE") {
            self.builder.lane_tolerance = parse_var("QARCH_LANE_TOLERANCE", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.simulator.max_qubits;
        if max == 0 || max > MAX_SUPPORTED_QUBITS {
            return Err(ConfigError::Invalid(format!(
                "max_qubits must be between 1 and {MAX_SUPPORTED_QUBITS}, got {max}"
            )));
        }

        let tolerance = self.simulator.tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 || tolerance > 1e-3 {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be in (0, 1e-3], got {tolerance}"
            )));
        }

        let lane = self.builder.lane_tolerance;
        if !lane.is_finite() || lane <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "lane_tolerance must be positive, got {lane}"
            )));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key}: cannot parse '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulator.max_qubits, 20);
        assert!(config.simulator.check_normalization);
        assert!((config.builder.lane_tolerance - 50.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("simulator:\n  max_qubits: 12\n").unwrap();
        assert_eq!(config.simulator.max_qubits, 12);
        assert!((config.simulator.tolerance - 1e-9).abs() < f64::EPSILON);
        assert_eq!(config.builder, BuilderConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.simulator.max_qubits = 31;
        assert!(config.validate().is_err());

        config.simulator.max_qubits = 0;
        assert!(config.validate().is_err());

        config.simulator.max_qubits = 10;
        config.simulator.tolerance = 0.1;
        assert!(config.validate().is_err());

        config.simulator.tolerance = 1e-6;
        config.builder.lane_tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_vars() {
        let config = Config::default()
            .merge_vars(|key| match key {
                "QARCH_MAX_QUBITS" => Some("8".into()),
                "QARCH_CHECK_NORMALIZATION" => Some("off".into()),
                "QARCH_LANE_TOLERANCE" => Some("12.5".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.simulator.max_qubits, 8);
        assert!(!config.simulator.check_normalization);
        assert!((config.builder.lane_tolerance - 12.5).abs() < f64::EPSILON);
        assert!((config.simulator.tolerance - 1e-9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_vars_rejects_garbage() {
        let err = Config::default()
            .merge_vars(|key| (key == "QARCH_MAX_QUBITS").then(|| "many".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_qubit_limit_is_capped() {
        let sim = SimConfig::default().with_max_qubits(64);
        assert_eq!(sim.qubit_limit(), MAX_SUPPORTED_QUBITS);
    }
}
