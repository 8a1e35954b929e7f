//! TOML configuration file for the agent.
//!
//! Everything is optional; a missing file section falls back to defaults.
//!
//! ```toml
//! [display]
//! max_dimension = 1280
//!
//! [timing]
//! clickHoldMs = 80
//! dragPixelsPerStep = 25
//! ```
//!
//! The `[timing]` table uses the same camelCase keys as the `configure`
//! command and is applied to the stock profile at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pilot_core::timing::{TimingError, TimingProfile, TimingUpdate};

use crate::application::input_controller::DEFAULT_MAX_DIMENSION;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The `[timing]` table holds an invalid value.
    #[error("invalid [timing] table: {0}")]
    Timing(#[from] TimingError),

    /// `max_dimension` must be greater than zero.
    #[error("display.max_dimension must be greater than zero")]
    ZeroMaxDimension,
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub timing: TimingUpdate,
}

/// Settings for the scaled display size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Longer side of the scaled display, in pixels.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
        }
    }
}

impl AgentConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if the TOML is malformed or has wrong types.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The stock profile with the `[timing]` table applied.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Timing`] for `dragPixelsPerStep = 0`.
    pub fn initial_profile(&self) -> Result<TimingProfile, ConfigError> {
        Ok(TimingProfile::default().apply(&self.timing)?)
    }

    /// Validated `display.max_dimension`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroMaxDimension`] for zero.
    pub fn max_dimension(&self) -> Result<u32, ConfigError> {
        match self.display.max_dimension {
            0 => Err(ConfigError::ZeroMaxDimension),
            n => Ok(n),
        }
    }
}

/// Loads `AgentConfig` from `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read and [`ConfigError::Parse`]
/// if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AgentConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    AgentConfig::from_toml(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_file_gives_defaults() {
        // Arrange / Act
        let cfg = AgentConfig::from_toml("").unwrap();

        // Assert
        assert_eq!(cfg, AgentConfig::default());
        assert_eq!(cfg.max_dimension().unwrap(), 1280);
        assert_eq!(cfg.initial_profile().unwrap(), TimingProfile::default());
    }

    #[test]
    fn test_timing_table_applies_to_stock_profile() {
        let cfg = AgentConfig::from_toml(
            r#"
            [timing]
            clickHoldMs = 80
            dragPixelsPerStep = 25
            "#,
        )
        .unwrap();

        let profile = cfg.initial_profile().unwrap();

        assert_eq!(profile.click_hold, Duration::from_millis(80));
        assert_eq!(profile.drag_pixels_per_step, 25);
        assert_eq!(profile.key_hold, TimingProfile::default().key_hold);
    }

    #[test]
    fn test_display_table_sets_max_dimension() {
        let cfg = AgentConfig::from_toml("[display]\nmax_dimension = 1024\n").unwrap();
        assert_eq!(cfg.max_dimension().unwrap(), 1024);
    }

    #[test]
    fn test_zero_max_dimension_is_rejected() {
        let cfg = AgentConfig::from_toml("[display]\nmax_dimension = 0\n").unwrap();
        assert!(matches!(
            cfg.max_dimension(),
            Err(ConfigError::ZeroMaxDimension)
        ));
    }

    #[test]
    fn test_zero_pixels_per_step_is_rejected() {
        let cfg = AgentConfig::from_toml("[timing]\ndragPixelsPerStep = 0\n").unwrap();
        assert!(matches!(cfg.initial_profile(), Err(ConfigError::Timing(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = AgentConfig::from_toml("[timing\nclickHoldMs = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_negative_delay_is_parse_error() {
        let result = AgentConfig::from_toml("[timing]\nclickHoldMs = -5\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/rfb-pilot/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
