//! TOML configuration for the CLI.
//!
//! Every field is optional. A missing file section falls back to the
//! embedded sample data, `data/generated` for output, and the default
//! [`ControlState`].

use std::path::{Path, PathBuf};

use seattle_access::buffer::BufferParams;
use seattle_access_models::ControlState;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Config path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`AccessConfig`].
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Buffer polygon settings.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Vertices per circle.
    pub segments: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            segments: BufferParams::default().segments,
        }
    }
}

/// CLI configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Data manifest. `None` uses the embedded Seattle sample.
    pub data: Option<PathBuf>,
    /// Directory `compute` writes into.
    pub output_dir: PathBuf,
    /// Initial control state.
    pub defaults: ControlState,
    /// Buffer settings.
    pub buffer: BufferConfig,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            data: None,
            output_dir: PathBuf::from("data/generated"),
            defaults: ControlState::default(),
            buffer: BufferConfig::default(),
        }
    }
}

impl AccessConfig {
    /// Parses a configuration from TOML. The default radius is snapped and
    /// clamped to the slider range.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::de::from_str(toml_str)?;
        config.defaults.set_radius(config.defaults.radius_meters);
        Ok(config)
    }

    /// Loads a configuration file. A relative `data` path resolves against
    /// the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;

        if let Some(data) = &config.data
            && data.is_relative()
            && let Some(parent) = path.parent()
        {
            config.data = Some(parent.join(data));
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Buffer parameters with the segment count raised to the minimum.
    #[must_use]
    pub fn buffer_params(&self) -> BufferParams {
        BufferParams {
            segments: self.buffer.segments.max(BufferParams::MIN_SEGMENTS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seattle_access_models::YearKey;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AccessConfig::from_toml("").unwrap();
        assert!(config.data.is_none());
        assert_eq!(config.output_dir, PathBuf::from("data/generated"));
        assert_eq!(config.defaults, ControlState::default());
        assert_eq!(config.buffer_params(), BufferParams::default());
    }

    #[test]
    fn parses_defaults_and_buffer() {
        let config = AccessConfig::from_toml(
            r#"
            data = "bundle/manifest.toml"
            output_dir = "out"

            [defaults]
            year = 2015
            radius_meters = 1212
            include_markets = true

            [defaults.enabled]
            pharmacies = false

            [buffer]
            segments = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.data, Some(PathBuf::from("bundle/manifest.toml")));
        assert_eq!(config.defaults.year, YearKey::Y2015);
        assert!((config.defaults.radius_meters - 1200.0).abs() < f64::EPSILON);
        assert!(config.defaults.include_markets);
        assert!(config.defaults.enabled.groceries);
        assert!(!config.defaults.enabled.pharmacies);
        assert_eq!(config.buffer_params().segments, BufferParams::MIN_SEGMENTS);
    }

    #[test]
    fn unknown_year_is_rejected() {
        let result = AccessConfig::from_toml("[defaults]\nyear = 2018\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
