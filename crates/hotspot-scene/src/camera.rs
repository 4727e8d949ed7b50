//! Camera controls and orbit navigation
//!
//! Drag to orbit around the origin. There is no pan or zoom, and the polar
//! angle stays between 45 and 90 degrees so the field is always seen from
//! above the horizon.

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_4;

/// Camera controller settings
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target_azimuth: f32,
    pub target_elevation: f32,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub sensitivity: f32,
    pub smooth_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::looking_from(Vec3::new(0.0, 1.6, 4.0), Vec3::ZERO)
    }
}

impl CameraSettings {
    /// Orbit settings that place the camera at `eye` looking at `target`
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length();
        let azimuth = offset.x.atan2(offset.z);
        let elevation = clamp_elevation(offset.y.atan2(Vec2::new(offset.x, offset.z).length()));

        Self {
            distance,
            azimuth,
            elevation,
            target_azimuth: azimuth,
            target_elevation: elevation,
            target,
            fov_degrees: 50.0,
            sensitivity: 0.005,
            smooth_factor: 0.15,
        }
    }

    pub fn eye(&self) -> Vec3 {
        orbit_position(self.target, self.distance, self.azimuth, self.elevation)
    }
}

/// Keep the polar angle within [45°, 90°]
pub fn clamp_elevation(elevation: f32) -> f32 {
    elevation.clamp(0.0, FRAC_PI_4)
}

/// Camera position on a Y-up orbit sphere
pub fn orbit_position(target: Vec3, distance: f32, azimuth: f32, elevation: f32) -> Vec3 {
    let horizontal = distance * elevation.cos();
    target
        + Vec3::new(
            horizontal * azimuth.sin(),
            distance * elevation.sin(),
            horizontal * azimuth.cos(),
        )
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, update_camera);
    }
}

fn spawn_camera(mut commands: Commands, settings: Res<CameraSettings>) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: settings.fov_degrees.to_radians(),
            ..default()
        }),
        Transform::from_translation(settings.eye()).looking_at(settings.target, Vec3::Y),
        MainCamera,
    ));
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Check if egui wants the mouse - if so, don't process camera controls
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    if mouse_button.pressed(MouseButton::Left) && !egui_wants_pointer {
        let delta = mouse_motion.delta;
        settings.target_azimuth -= delta.x * settings.sensitivity;
        settings.target_elevation =
            clamp_elevation(settings.target_elevation + delta.y * settings.sensitivity);
    }

    let dt = time.delta_secs();
    let lerp_factor = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
    settings.azimuth += (settings.target_azimuth - settings.azimuth) * lerp_factor;
    settings.elevation += (settings.target_elevation - settings.elevation) * lerp_factor;

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = settings.eye();
        transform.look_at(settings.target, Vec3::Y);
    }
}
