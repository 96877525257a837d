//! Application configuration
//!
//! Read from `assets/config.ron` at startup. Every field has a default, so
//! the file may list only what it changes, or be absent entirely.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::carousel::{BlurSettings, CarouselSettings};
use crate::rasterizer::RasterSettings;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Drag recognition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Horizontal travel in window pixels before a release counts as a swipe
    pub min_translation: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self { min_translation: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// 320x240 when set, 640x480 otherwise
    pub low_resolution: bool,
    pub raster: RasterSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            low_resolution: true,
            raster: RasterSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scene_path: PathBuf,
    pub carousel: CarouselSettings,
    pub blur: BlurSettings,
    pub gesture: GestureSettings,
    pub render: RenderSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scene_path: PathBuf::from("assets/scenes/main_scene.ron"),
            carousel: CarouselSettings::default(),
            blur: BlurSettings::default(),
            gesture: GestureSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load the config file, falling back to defaults when it does not exist.
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io { path: path.to_path_buf(), source });
            }
        };

        let config = Self::from_ron_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}
