//! Hotspot Scene - Bevy rendering for an interactive hotspot field
//!
//! This crate draws a `HotspotField` from hotspot-core: glTF models loaded
//! through the Bevy asset server with procedural icons as fallback, mesh
//! picking routed to the field, egui labels and a detail panel, an orbit
//! camera and an optional floating herb centerpiece.
//!
//! The host app is expected to add `DefaultPlugins`, `DefaultPickingPlugins`,
//! `MeshPickingPlugin` and `EguiPlugin` before this plugin.

pub mod camera;
pub mod herb;
pub mod hotspots;
pub mod icons;
pub mod models;
pub mod scene;
pub mod ui;

use bevy::prelude::*;
use hotspot_core::{AnimationSettings, HotspotField, HotspotRegistry};

/// Plugin that sets up the hotspot scene
pub struct HotspotScenePlugin {
    pub registry: HotspotRegistry,
    pub settings: AnimationSettings,
    pub show_herb: bool,
}

impl HotspotScenePlugin {
    pub fn new(registry: HotspotRegistry, settings: AnimationSettings) -> Self {
        Self {
            registry,
            settings,
            show_herb: true,
        }
    }

    pub fn with_herb(mut self, show_herb: bool) -> Self {
        self.show_herb = show_herb;
        self
    }
}

impl Plugin for HotspotScenePlugin {
    fn build(&self, app: &mut App) {
        let loader = models::ModelLoader::default();
        let field = HotspotField::new(self.registry.clone(), loader.clone(), self.settings.clone());

        app.insert_resource(loader)
            .insert_resource(hotspots::HotspotFieldRes(field))
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(hotspots::HotspotsPlugin)
            .add_plugins(ui::UiPlugin);

        if self.show_herb {
            app.add_plugins(herb::HerbPlugin);
        }
    }
}

// Re-export commonly used types
pub use camera::CameraSettings;
pub use hotspots::{FieldFrames, HotspotFieldRes};
pub use models::ModelLoader;
