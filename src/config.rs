use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MARGIN_WIDTH: f64 = 100.0;
const DEFAULT_MARGIN_HEIGHT: f64 = 60.0;
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;
const DEFAULT_THUMBNAIL_WIDTH_VMIN: f64 = 24.0;
const DEFAULT_THUMBNAIL_HEIGHT_VMIN: f64 = 18.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 3.0,
        }
    }
}

/// Speaker tile insets and shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal space reserved around the speaker tile.
    pub margin_width: f64,
    /// Vertical space reserved around the speaker tile.
    pub margin_height: f64,
    pub aspect_ratio: AspectRatio,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_width: DEFAULT_MARGIN_WIDTH,
            margin_height: DEFAULT_MARGIN_HEIGHT,
            aspect_ratio: AspectRatio::default(),
        }
    }
}

/// Thumbnail size in `vmin` units of the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub width_vmin: f64,
    pub height_vmin: f64,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width_vmin: DEFAULT_THUMBNAIL_WIDTH_VMIN,
            height_vmin: DEFAULT_THUMBNAIL_HEIGHT_VMIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmstripConfig {
    pub layout: LayoutConfig,
    pub resize_debounce_ms: u64,
    pub thumbnail: ThumbnailConfig,
}

impl Default for FilmstripConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            thumbnail: ThumbnailConfig::default(),
        }
    }
}

impl FilmstripConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FilmstripConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::info!("FilmstripConfig::load: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if !(layout.margin_width >= 0.0 && layout.margin_height >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "margins must be non-negative, got {}x{}",
                layout.margin_width, layout.margin_height
            )));
        }
        if !(layout.aspect_ratio.width > 0.0 && layout.aspect_ratio.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "aspect ratio terms must be positive, got {}:{}",
                layout.aspect_ratio.width, layout.aspect_ratio.height
            )));
        }
        if !(self.thumbnail.width_vmin > 0.0 && self.thumbnail.height_vmin > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "thumbnail size must be positive, got {}x{} vmin",
                self.thumbnail.width_vmin, self.thumbnail.height_vmin
            )));
        }
        Ok(())
    }
}
