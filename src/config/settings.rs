//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::calc::{Calculators, CopperProperties, Ipc2221Coefficients};
use crate::error::ConfigError;

/// Log levels accepted in `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Conductor material properties.
    #[serde(default)]
    pub copper: CopperProperties,

    /// IPC-2221 curve-fit coefficients.
    #[serde(default)]
    pub ipc2221: Ipc2221Coefficients,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("copper.resistivity_20c", self.copper.resistivity_20c),
            ("copper.thermal_conductivity", self.copper.thermal_conductivity),
            ("ipc2221.k_external", self.ipc2221.k_external),
            ("ipc2221.k_internal", self.ipc2221.k_internal),
            ("ipc2221.rise_exponent", self.ipc2221.rise_exponent),
            ("ipc2221.area_exponent", self.ipc2221.area_exponent),
        ];
        for (name, value) in values {
            require_positive(name, value)?;
        }

        // α may legitimately be zero (constantan-like alloys), but must be a number
        if !self.copper.temp_coefficient.is_finite() {
            return Err(ConfigError::ValidationError {
                message: "copper.temp_coefficient must be a finite number".to_string(),
            });
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }

    /// Builds the calculators configured by this file.
    #[must_use]
    pub const fn calculators(&self) -> Calculators {
        Calculators::new(self.ipc2221, self.copper)
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: format!("{name} must be a finite, positive number (got {value})"),
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.copper, CopperProperties::ANNEALED);
        assert_eq!(config.ipc2221, Ipc2221Coefficients::STANDARD);
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "copper": {
                "resistivity_20c": 1.72e-8,
                "temp_coefficient": 0.00393,
                "thermal_conductivity": 390.0
            },
            "ipc2221": {
                "k_external": 0.05,
                "k_internal": 0.025,
                "rise_exponent": 0.44,
                "area_exponent": 0.725
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!((config.copper.resistivity_20c - 1.72e-8).abs() < f64::EPSILON);
        assert!((config.copper.thermal_conductivity - 390.0).abs() < f64::EPSILON);
        assert!((config.ipc2221.k_external - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");

        let calcs = config.calculators();
        assert!((calcs.copper().temp_coefficient - 0.00393).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_section_keeps_defaults() {
        let json = r#"{ "copper": { "thermal_conductivity": 400.0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!((config.copper.thermal_conductivity - 400.0).abs() < f64::EPSILON);
        assert!((config.copper.resistivity_20c - 1.68e-8).abs() < f64::EPSILON);
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_non_positive_constant() {
        let json = r#"{ "ipc2221": { "k_internal": 0.0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn zero_temp_coefficient_is_allowed() {
        let json = r#"{ "copper": { "temp_coefficient": 0.0 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reject_invalid_log_level() {
        let json = r#"{ "logging": { "level": "loud" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn reject_unknown_material_field() {
        let json = r#"{ "copper": { "density": 8960.0 } }"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
