//! Hotspot definitions - identity, placement, display text, and icon kind

use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon requested by a hotspot
///
/// Parsing never fails: anything unrecognized becomes `Unknown`, which still
/// maps to a drawable procedural shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconKind {
    Leaf,
    Mortar,
    Calendar,
    #[default]
    Unknown,
}

impl IconKind {
    /// Parse an icon name (case-insensitive)
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "leaf" => IconKind::Leaf,
            "mortar" => IconKind::Mortar,
            "calendar" => IconKind::Calendar,
            _ => IconKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IconKind::Leaf => "leaf",
            IconKind::Mortar => "mortar",
            IconKind::Calendar => "calendar",
            IconKind::Unknown => "unknown",
        }
    }

    /// Procedural shape drawn when no external asset is available
    pub fn procedural_shape(&self) -> ProceduralShape {
        match self {
            IconKind::Leaf => ProceduralShape::Leaf,
            IconKind::Mortar => ProceduralShape::Mortar,
            IconKind::Calendar => ProceduralShape::Calendar,
            IconKind::Unknown => ProceduralShape::Leaf,
        }
    }

    /// Conventional model location for this icon, if one exists
    pub fn default_model_path(&self) -> Option<&'static str> {
        match self {
            IconKind::Leaf => Some("/models/leaf.glb"),
            IconKind::Mortar => Some("/models/mortar.glb"),
            IconKind::Calendar => Some("/models/calendar.glb"),
            IconKind::Unknown => None,
        }
    }
}

impl From<String> for IconKind {
    fn from(value: String) -> Self {
        IconKind::parse(&value)
    }
}

impl From<IconKind> for String {
    fn from(kind: IconKind) -> Self {
        kind.label().to_string()
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Built-in shape the renderer knows how to draw without any external asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProceduralShape {
    Leaf,
    Mortar,
    Calendar,
}

impl ProceduralShape {
    pub fn name(&self) -> &'static str {
        match self {
            ProceduralShape::Leaf => "leaf",
            ProceduralShape::Mortar => "mortar",
            ProceduralShape::Calendar => "calendar",
        }
    }
}

impl fmt::Display for ProceduralShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed point of interest in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    /// Unique key
    pub id: String,
    /// World-space position (x, y, z)
    pub position: [f32; 3],
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: IconKind,
    /// Optional external model reference (path or URL)
    #[serde(default)]
    pub asset: Option<String>,
}

impl Hotspot {
    pub fn new(id: impl Into<String>, position: [f32; 3], icon: IconKind) -> Self {
        Self {
            id: id.into(),
            position,
            title: String::new(),
            description: String::new(),
            icon,
            asset: None,
        }
    }

    pub fn with_text(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.title = title.into();
        self.description = description.into();
        self
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Asset reference, treating blank strings as absent
    pub fn asset_ref(&self) -> Option<&str> {
        self.asset
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Resting height before bobbing is applied
    pub fn base_y(&self) -> f32 {
        self.position[1]
    }
}
