//! Movement configuration
//!
//! The only option the movement code itself consumes is the default hitbox
//! radius. Invalid values never fail a load: they fall back to
//! [`DEFAULT_HITBOX_RADIUS`] with a warning.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::Config;

/// Fallback half-width of a character hitbox, in tiles
pub const DEFAULT_HITBOX_RADIUS: f64 = 0.5;

/// Default edge length of a spatial grid cell, in tiles
pub const DEFAULT_CELL_SIZE: f64 = 1.0;

/// Parameter key for the hitbox radius
pub const HITBOX_RADIUS_KEY: &str = "character hitbox radius";

/// Settings for the free movement subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeMoveConfig {
    /// Half-width of the hitbox for characters without a full-tile footprint
    #[serde(
        alias = "character hitbox radius",
        default = "default_hitbox_radius",
        deserialize_with = "lenient_radius"
    )]
    pub hitbox_radius: f64,

    /// Edge length of one cell in the grid spatial index
    #[serde(alias = "spatial cell size", default = "default_cell_size")]
    pub spatial_cell_size: f64,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(alias = "log level", default = "default_log_level")]
    pub log_level: String,
}

impl FreeMoveConfig {
    /// Build from a flat string parameter table (plugin-style `key -> value`)
    ///
    /// Unknown keys are ignored and unparseable values fall back to defaults.
    pub fn from_parameters(params: &HashMap<String, String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = params.get(HITBOX_RADIUS_KEY) {
            config.hitbox_radius = sanitize_radius(raw.trim().parse().ok());
        }
        if let Some(size) = params
            .get("spatial cell size")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|size| size.is_finite() && *size > 0.0)
        {
            config.spatial_cell_size = size;
        }
        if let Some(level) = params.get("log level") {
            config.log_level = level.trim().to_string();
        }
        config
    }

    /// Radius to use for characters without an explicit override
    ///
    /// Re-validates the public field so a hand-edited value can't produce a
    /// degenerate box.
    pub fn hitbox_radius(&self) -> f64 {
        sanitize_radius(Some(self.hitbox_radius))
    }

    /// Cell size to use for the grid index
    pub fn cell_size(&self) -> f64 {
        if self.spatial_cell_size.is_finite() && self.spatial_cell_size > 0.0 {
            self.spatial_cell_size
        } else {
            DEFAULT_CELL_SIZE
        }
    }
}

impl Default for FreeMoveConfig {
    fn default() -> Self {
        Self {
            hitbox_radius: DEFAULT_HITBOX_RADIUS,
            spatial_cell_size: DEFAULT_CELL_SIZE,
            log_level: default_log_level(),
        }
    }
}

impl Config for FreeMoveConfig {}

fn default_hitbox_radius() -> f64 {
    DEFAULT_HITBOX_RADIUS
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

fn sanitize_radius(raw: Option<f64>) -> f64 {
    match raw {
        Some(radius) if radius.is_finite() && radius > 0.0 => radius,
        Some(radius) => {
            log::warn!("Ignoring invalid {HITBOX_RADIUS_KEY} {radius}, using {DEFAULT_HITBOX_RADIUS}");
            DEFAULT_HITBOX_RADIUS
        }
        None => {
            log::warn!("Ignoring non-numeric {HITBOX_RADIUS_KEY}, using {DEFAULT_HITBOX_RADIUS}");
            DEFAULT_HITBOX_RADIUS
        }
    }
}

/// Accepts numbers and numeric strings; anything else becomes `None`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRadius {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_radius<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match RawRadius::deserialize(deserializer)? {
        RawRadius::Number(value) => Some(value),
        RawRadius::Text(text) => text.trim().parse().ok(),
        RawRadius::Other(_) => None,
    };
    Ok(sanitize_radius(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_defaults() {
        let config = FreeMoveConfig::default();
        assert_eq!(config.hitbox_radius(), 0.5);
        assert_eq!(config.cell_size(), 1.0);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_toml_with_quoted_key() {
        let config: FreeMoveConfig = toml::from_str(
            r#"
            "character hitbox radius" = 0.375
            "spatial cell size" = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.hitbox_radius(), 0.375);
        assert_eq!(config.cell_size(), 2.0);
    }

    #[test]
    fn test_snake_case_keys() {
        let config: FreeMoveConfig = toml::from_str("hitbox_radius = 0.45\nlog_level = \"debug\"").unwrap();
        assert_eq!(config.hitbox_radius(), 0.45);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_integer_and_string_radius_accepted() {
        let config: FreeMoveConfig = toml::from_str(r#""character hitbox radius" = 1"#).unwrap();
        assert_eq!(config.hitbox_radius(), 1.0);

        let config: FreeMoveConfig = toml::from_str(r#""character hitbox radius" = "0.25""#).unwrap();
        assert_eq!(config.hitbox_radius(), 0.25);
    }

    #[test]
    fn test_invalid_radius_falls_back() {
        let config: FreeMoveConfig = toml::from_str(r#""character hitbox radius" = -0.3"#).unwrap();
        assert_eq!(config.hitbox_radius(), DEFAULT_HITBOX_RADIUS);

        let config: FreeMoveConfig = toml::from_str(r#""character hitbox radius" = "wide""#).unwrap();
        assert_eq!(config.hitbox_radius(), DEFAULT_HITBOX_RADIUS);

        let config: FreeMoveConfig = toml::from_str(r#""character hitbox radius" = [1, 2]"#).unwrap();
        assert_eq!(config.hitbox_radius(), DEFAULT_HITBOX_RADIUS);

        let config: FreeMoveConfig = toml::from_str(r#""character hitbox radius" = 0"#).unwrap();
        assert_eq!(config.hitbox_radius(), DEFAULT_HITBOX_RADIUS);
    }

    #[test]
    fn test_hand_edited_field_is_revalidated() {
        let config = FreeMoveConfig {
            hitbox_radius: f64::NAN,
            ..FreeMoveConfig::default()
        };
        assert_eq!(config.hitbox_radius(), DEFAULT_HITBOX_RADIUS);
    }

    #[test]
    fn test_from_parameters() {
        let mut params = HashMap::new();
        params.insert(HITBOX_RADIUS_KEY.to_string(), " 0.4 ".to_string());
        params.insert("spatial cell size".to_string(), "nope".to_string());
        let config = FreeMoveConfig::from_parameters(&params);
        assert_eq!(config.hitbox_radius(), 0.4);
        assert_eq!(config.cell_size(), DEFAULT_CELL_SIZE);

        params.insert(HITBOX_RADIUS_KEY.to_string(), "".to_string());
        let config = FreeMoveConfig::from_parameters(&params);
        assert_eq!(config.hitbox_radius(), DEFAULT_HITBOX_RADIUS);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = std::env::temp_dir().join("free_move_config_test.ron");
        let path = path.to_string_lossy().to_string();
        let config = FreeMoveConfig {
            hitbox_radius: 0.3,
            ..FreeMoveConfig::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = FreeMoveConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = FreeMoveConfig::default().save_to_file("settings.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
