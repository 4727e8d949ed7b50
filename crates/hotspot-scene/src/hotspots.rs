//! Hotspot entities - picking, per-frame transforms and visual swaps
//!
//! Each hotspot is a root entity positioned and scaled from the field's frame
//! output. Its children are either a glTF scene or procedural icon parts,
//! rebuilt only when the resolved visual changes. Pointer events from any
//! descendant are routed to the field by walking up to the hotspot root.

use bevy::prelude::*;
use bevy_picking::prelude::{Click, Out, Over, Pointer};
use hotspot_core::{HotspotField, HotspotFrame, ProceduralShape, ResolvedVisual};

use crate::icons::spawn_icon;
use crate::models::{drive_model_loads, ModelLoader};

/// The field driving this scene
#[derive(Resource)]
pub struct HotspotFieldRes(pub HotspotField<ModelLoader>);

/// Output of the latest `HotspotField::frame`
#[derive(Resource, Default)]
pub struct FieldFrames(pub Vec<HotspotFrame<Handle<Scene>>>);

/// Root entity of one hotspot
#[derive(Component)]
pub struct HotspotRoot {
    pub id: String,
    shown: ShownVisual,
}

/// Loaded model child, scaled by selection state
#[derive(Component)]
pub struct HotspotModel;

#[derive(Debug, Clone, PartialEq)]
enum ShownVisual {
    Nothing,
    Model(AssetId<Scene>),
    Procedural(ProceduralShape),
}

impl ShownVisual {
    fn of(visual: Option<&ResolvedVisual<Handle<Scene>>>) -> Self {
        match visual {
            None => ShownVisual::Nothing,
            Some(ResolvedVisual::LoadedAsset(handle)) => ShownVisual::Model(handle.id()),
            Some(ResolvedVisual::Procedural(shape)) => ShownVisual::Procedural(*shape),
        }
    }
}

/// Scale of a loaded model inside its animated hotspot transform
pub fn model_scale(is_active: bool) -> f32 {
    if is_active {
        0.8
    } else {
        0.6
    }
}

pub struct HotspotsPlugin;

impl Plugin for HotspotsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FieldFrames>()
            .add_systems(Startup, spawn_hotspots)
            .add_systems(
                Update,
                (
                    handle_escape,
                    advance_field.after(drive_model_loads),
                    sync_hotspot_visuals,
                    log_detail_changes,
                )
                    .chain(),
            )
            .add_observer(on_pointer_over)
            .add_observer(on_pointer_out)
            .add_observer(on_pointer_click);
    }
}

fn spawn_hotspots(mut commands: Commands, field: Res<HotspotFieldRes>) {
    for hotspot in field.0.registry().iter() {
        commands.spawn((
            Transform::from_translation(Vec3::from(hotspot.position)),
            Visibility::default(),
            HotspotRoot {
                id: hotspot.id.clone(),
                shown: ShownVisual::Nothing,
            },
            Name::new(format!("hotspot:{}", hotspot.id)),
        ));
    }
    tracing::info!("Spawned {} hotspots", field.0.registry().len());
}

/// Advance the field clock and record what to draw this frame
pub fn advance_field(
    time: Res<Time>,
    mut field: ResMut<HotspotFieldRes>,
    mut frames: ResMut<FieldFrames>,
) {
    frames.0 = field.0.frame(time.elapsed_secs());
}

fn sync_hotspot_visuals(
    mut commands: Commands,
    frames: Res<FieldFrames>,
    mut roots: Query<(Entity, &mut HotspotRoot, &mut Transform), Without<HotspotModel>>,
    mut models: Query<(&ChildOf, &mut Transform), With<HotspotModel>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, mut root, mut transform) in &mut roots {
        let Some(frame) = frames.0.iter().find(|f| f.id == root.id) else {
            continue;
        };

        transform.translation = Vec3::from(frame.position);
        transform.scale = Vec3::splat(frame.scale);

        let wanted = ShownVisual::of(frame.visual.as_ref());
        if wanted == root.shown {
            continue;
        }

        commands.entity(entity).despawn_related::<Children>();
        match &frame.visual {
            None => {}
            Some(ResolvedVisual::LoadedAsset(handle)) => {
                commands.spawn((
                    SceneRoot(handle.clone()),
                    Transform::from_scale(Vec3::splat(model_scale(frame.is_active))),
                    HotspotModel,
                    ChildOf(entity),
                ));
            }
            Some(ResolvedVisual::Procedural(shape)) => {
                spawn_icon(&mut commands, entity, *shape, &mut meshes, &mut materials);
            }
        }
        tracing::debug!(id = %root.id, visual = ?wanted, "Hotspot visual changed");
        root.shown = wanted;
    }

    for (child_of, mut transform) in &mut models {
        let Ok((_, root, _)) = roots.get(child_of.parent()) else {
            continue;
        };
        let is_active = frames
            .0
            .iter()
            .any(|f| f.id == root.id && f.is_active);
        transform.scale = Vec3::splat(model_scale(is_active));
    }
}

fn handle_escape(keyboard: Res<ButtonInput<KeyCode>>, mut field: ResMut<HotspotFieldRes>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        field.0.deactivate();
    }
}

fn log_detail_changes(mut field: ResMut<HotspotFieldRes>) {
    match field.0.take_detail_change() {
        Some(Some(panel)) => tracing::info!(id = %panel.id, title = %panel.title, "Showing hotspot details"),
        Some(None) => tracing::info!("Hotspot details closed"),
        None => {}
    }
}

/// Find the nearest ancestor (including self) that is a hotspot root
fn find_hotspot_ancestor(
    entity: Entity,
    roots: &Query<&HotspotRoot>,
    parents: &Query<&ChildOf>,
) -> Option<String> {
    let mut current = entity;
    loop {
        if let Ok(root) = roots.get(current) {
            return Some(root.id.clone());
        }
        current = parents.get(current).ok()?.parent();
    }
}

fn on_pointer_over(
    trigger: On<Pointer<Over>>,
    roots: Query<&HotspotRoot>,
    parents: Query<&ChildOf>,
    mut field: ResMut<HotspotFieldRes>,
) {
    let entity = trigger.event().event_target();
    if let Some(id) = find_hotspot_ancestor(entity, &roots, &parents) {
        field.0.on_pointer_enter(&id);
    }
}

fn on_pointer_out(
    trigger: On<Pointer<Out>>,
    roots: Query<&HotspotRoot>,
    parents: Query<&ChildOf>,
    mut field: ResMut<HotspotFieldRes>,
) {
    let entity = trigger.event().event_target();
    if let Some(id) = find_hotspot_ancestor(entity, &roots, &parents) {
        field.0.on_pointer_leave(&id);
    }
}

fn on_pointer_click(
    trigger: On<Pointer<Click>>,
    roots: Query<&HotspotRoot>,
    parents: Query<&ChildOf>,
    mut field: ResMut<HotspotFieldRes>,
) {
    let entity = trigger.event().event_target();
    if let Some(id) = find_hotspot_ancestor(entity, &roots, &parents) {
        field.0.click(&id);
    }
}
