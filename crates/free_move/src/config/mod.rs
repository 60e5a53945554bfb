//! Configuration system
//!
//! Movement settings ([`FreeMoveConfig`]: default hitbox radius, grid cell
//! size, log filter) load from and save to `.toml` or `.ron` files. The format
//! is picked from the file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

mod movement;

pub use movement::{FreeMoveConfig, DEFAULT_CELL_SIZE, DEFAULT_HITBOX_RADIUS};

/// On-disk formats understood by [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn from_path(path: &str) -> Result<Self, ConfigError> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_string())),
        }
    }
}

/// Settings that round-trip through a config file
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read settings from `path`
    ///
    /// Lenient fields (such as the hitbox radius) fall back to their defaults
    /// instead of failing the load.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        let parsed = match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
        };
        log::debug!("Loaded settings from {path}");
        Ok(parsed)
    }

    /// Write settings to `path`
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = match Format::from_path(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Errors reading or writing a settings file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML/RON for the settings type
    #[error("Parse error: {0}")]
    Parse(String),

    /// The settings could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Extension other than `.toml` or `.ron`
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
