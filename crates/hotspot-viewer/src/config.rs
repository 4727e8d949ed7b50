//! Configuration loading and validation

use anyhow::Result;
use hotspot_core::FieldConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub field: FieldConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Window title
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Background color as sRGB (0.0-1.0)
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 3],
    /// Show the floating herb centerpiece
    #[serde(default = "default_true")]
    pub show_herb: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            clear_color: default_clear_color(),
            show_herb: true,
        }
    }
}

fn default_title() -> String {
    "Ayurveda Hotspots".to_string()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_clear_color() -> [f32; 3] {
    // #ecfdf5
    [0.925, 0.992, 0.961]
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory that asset references like `/models/leaf.glb` resolve against
    #[serde(default = "default_assets_root")]
    pub root: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_assets_root(),
        }
    }
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

/// Parse and validate configuration text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.field.validate()?;
    Ok(config)
}

/// Load configuration from file, or defaults if it does not exist
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config = parse_config(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}
