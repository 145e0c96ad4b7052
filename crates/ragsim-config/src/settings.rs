//! User settings file (TOML).

use std::path::Path;

use ragsim_core::{Canvas, DEFAULT_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Simulator settings.
///
/// Every key is optional:
///
/// ```toml
/// history_limit = 200   # 0 = unlimited
///
/// [canvas]
/// width = 800.0
/// height = 600.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of undo entries kept (0 = unlimited).
    pub history_limit: usize,
    /// Canvas used by the automatic layout.
    pub canvas: CanvasSettings,
}

/// `[canvas]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasSettings {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        let canvas = Canvas::default();
        Self {
            width: canvas.width,
            height: canvas.height,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            canvas: CanvasSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects non-positive or non-finite canvas dimensions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid_setting(
                    key,
                    format!("must be a positive number, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// The configured canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas.width, self.canvas.height)
    }
}
