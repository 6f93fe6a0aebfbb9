//! Calculator configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::history::History;
use crate::core::{DEFAULT_DECIMAL_PLACES, DEFAULT_ERROR_SENTINEL};

/// Key the history is persisted under
pub const DEFAULT_HISTORY_KEY: &str = "calculator-history";

/// Largest supported rounding precision; f64 has ~15-17 significant digits
pub const MAX_DECIMAL_PLACES: usize = 15;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid configuration value for `{field}`: {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Calculator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Maximum number of history entries kept and persisted
    pub history_capacity: usize,
    /// Key-value store key for the persisted history
    pub history_key: String,
    /// Display string after a failed evaluation
    pub error_sentinel: String,
    /// Rounding precision for non-integer results
    pub decimal_places: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            history_capacity: History::DEFAULT_MAX_ENTRIES,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            error_sentinel: DEFAULT_ERROR_SENTINEL.to_string(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl CalculatorConfig {
    /// Parses and validates a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::invalid("history_capacity", "must be at least 1"));
        }
        if self.history_key.is_empty() {
            return Err(ConfigError::invalid("history_key", "must not be empty"));
        }
        if self.error_sentinel.is_empty() || self.error_sentinel.trim().parse::<f64>().is_ok() {
            return Err(ConfigError::invalid(
                "error_sentinel",
                format!("{:?} is indistinguishable from a number", self.error_sentinel),
            ));
        }
        if self.decimal_places == 0 || self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::invalid(
                "decimal_places",
                format!("must be between 1 and {MAX_DECIMAL_PLACES}"),
            ));
        }
        Ok(())
    }
}
