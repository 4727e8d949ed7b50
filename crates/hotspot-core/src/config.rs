//! Field configuration - animation tunables and the hotspot list

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::animation::AnimationSettings;
use crate::hotspot::Hotspot;
use crate::registry::{default_hotspots, HotspotRegistry, RegistryError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Invalid hotspot list: {0}")]
    Registry(#[from] RegistryError),
}

/// Everything needed to build a `HotspotField` apart from the asset loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub animation: AnimationSettings,
    #[serde(default = "default_hotspots", rename = "hotspot")]
    pub hotspots: Vec<Hotspot>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            animation: AnimationSettings::default(),
            hotspots: default_hotspots(),
        }
    }
}

impl FieldConfig {
    /// Parse from a TOML string and validate
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.animation.validate()?;
        HotspotRegistry::new(self.hotspots.clone())?;
        Ok(())
    }

    /// Build the read-only registry for this configuration
    pub fn registry(&self) -> Result<HotspotRegistry, ConfigError> {
        Ok(HotspotRegistry::new(self.hotspots.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::DampingMode;
    use crate::hotspot::IconKind;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FieldConfig::from_toml("").unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.hotspots.len(), 3);
        assert_eq!(config.animation, AnimationSettings::default());
    }

    #[test]
    fn test_parse_hotspots_and_animation() {
        let toml = r#"
[animation]
damping = 0.2
damping_mode = { mode = "time_normalized", reference_fps = 120.0 }

[[hotspot]]
id = "herbal"
position = [-0.9, 0.05, 0.08]
title = "Herbal Medicine"
description = "Custom formulations"
icon = "Leaf"

[[hotspot]]
id = "mystery"
position = [0.0, 0.0, 0.0]
title = "Mystery"
icon = "lotus"
asset = "/models/lotus.glb"
"#;

        let config = FieldConfig::from_toml(toml).unwrap();
        assert_eq!(config.animation.damping, 0.2);
        assert_eq!(config.animation.bob_frequency, 1.2);
        assert_eq!(
            config.animation.damping_mode,
            DampingMode::TimeNormalized { reference_fps: 120.0 }
        );

        assert_eq!(config.hotspots.len(), 2);
        assert_eq!(config.hotspots[0].icon, IconKind::Leaf);
        assert!(config.hotspots[0].asset_ref().is_none());
        assert_eq!(config.hotspots[1].icon, IconKind::Unknown);
        assert_eq!(config.hotspots[1].asset_ref(), Some("/models/lotus.glb"));

        let registry = config.registry().unwrap();
        assert!(registry.contains("mystery"));
    }

    #[test]
    fn test_duplicate_hotspot_rejected() {
        let toml = r#"
[[hotspot]]
id = "a"
position = [0.0, 0.0, 0.0]
title = "A"

[[hotspot]]
id = "a"
position = [1.0, 0.0, 0.0]
title = "A again"
"#;

        let err = FieldConfig::from_toml(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Registry(RegistryError::DuplicateId(_))));
    }

    #[test]
    fn test_invalid_animation_rejected() {
        let err = FieldConfig::from_toml("[animation]\ndamping = 2.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("field.toml");
        std::fs::write(&path, "[animation]\nbob_amplitude = 0.05\n").unwrap();

        let config = FieldConfig::from_file(&path).unwrap();
        assert_eq!(config.animation.bob_amplitude, 0.05);

        let missing = FieldConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
