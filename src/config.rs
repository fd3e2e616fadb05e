//! Engine configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration.

use crate::error::{Result, SprintboardError};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Tuning for the ordering engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    /// Offset applied past the first or last neighbour when an issue is
    /// dropped at a scope edge
    pub boundary_step: f64,
    /// Spacing between consecutive order values after renormalization
    pub stride: f64,
    /// Smallest neighbour gap a midpoint may be taken from
    pub min_gap: f64,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            boundary_step: 1.0,
            stride: 1000.0,
            min_gap: 1e-6,
        }
    }
}

impl OrderingConfig {
    /// Checks the values can produce strictly increasing orders. Configs
    /// read through [`EngineConfig`] are checked on load; one built in code
    /// is checked by the ordering engine before use.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.boundary_step) {
            return Err(SprintboardError::ConfigError(
                "ordering.boundary_step must be a positive number".to_string(),
            ));
        }
        if !positive(self.stride) {
            return Err(SprintboardError::ConfigError(
                "ordering.stride must be a positive number".to_string(),
            ));
        }
        if !positive(self.min_gap) || self.min_gap >= self.stride {
            return Err(SprintboardError::ConfigError(
                "ordering.min_gap must be positive and smaller than ordering.stride".to_string(),
            ));
        }
        Ok(())
    }
}

/// chrono strftime patterns used by the presentation formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub date_format: String,
    pub date_time_format: String,
    /// Short form used for burndown axis labels
    pub label_format: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            date_format: "%b %-d, %Y".to_string(),
            date_time_format: "%b %-d, %Y %H:%M".to_string(),
            label_format: "%b %-d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ordering: OrderingConfig,
    pub format: FormatConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| SprintboardError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).await.map_err(|e| {
            SprintboardError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Self::from_json_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        self.ordering.validate()?;

        let format = &self.format;
        for (name, pattern) in [
            ("format.date_format", &format.date_format),
            ("format.date_time_format", &format.date_time_format),
            ("format.label_format", &format.label_format),
        ] {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(SprintboardError::ConfigError(format!(
                    "{} is not a valid date pattern: {:?}",
                    name, pattern
                )));
            }
        }
        Ok(())
    }
}
