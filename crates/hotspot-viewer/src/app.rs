//! Bevy application setup

use anyhow::Result;
use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use hotspot_scene::HotspotScenePlugin;

use crate::config::Config;

pub fn run(config: Config) -> Result<()> {
    let registry = config.field.registry()?;
    let [r, g, b] = config.viewer.clear_color;

    App::new()
        .insert_resource(ClearColor(Color::srgb(r, g, b)))
        .insert_resource(WinitSettings::default())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.viewer.title.clone(),
                        resolution: WindowResolution::new(config.viewer.width, config.viewer.height),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Asset references like /models/leaf.glb resolve under the assets root
                    file_path: config.assets.root.to_string_lossy().into_owned(),
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking must be added before EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(
            HotspotScenePlugin::new(registry, config.field.animation.clone())
                .with_herb(config.viewer.show_herb),
        )
        .run();

    Ok(())
}
