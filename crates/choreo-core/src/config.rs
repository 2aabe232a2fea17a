//! Editor configuration.

use crate::bindings::BindingConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::snap::GridConfig;
use crate::stage::DEFAULT_DANCER_RADIUS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the selection and manipulation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid: GridConfig,
    pub bindings: BindingConfig,
    /// Radius of newly spawned dancers, in stage units.
    pub dancer_radius: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            bindings: BindingConfig::default(),
            dancer_radius: DEFAULT_DANCER_RADIUS,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check settings that serde alone cannot enforce.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.dancer_radius.is_finite() && self.dancer_radius > 0.0) {
            return Err(ConfigError::InvalidConfiguration(format!(
                "dancer radius must be positive, got {}",
                self.dancer_radius
            )));
        }
        if self.bindings.multi_select.is_empty() {
            log::warn!("No multi-select keys bound; additive selection is unavailable");
        }
        Ok(())
    }
}
