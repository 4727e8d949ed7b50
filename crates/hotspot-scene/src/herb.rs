//! Floating herb centerpiece - a potted plant that slowly spins and bobs

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// Root of the herb group
#[derive(Component)]
pub struct FloatingHerb;

/// A swaying leaf, keeping the pitch and yaw it was placed with
#[derive(Component)]
pub struct HerbLeaf {
    pub pitch: f32,
    pub yaw: f32,
}

const SPIN_SPEED: f32 = 0.2;

/// Height of the herb group at `elapsed` seconds
pub fn herb_height(elapsed: f32) -> f32 {
    (elapsed * 0.8).sin() * 0.18 + 0.45
}

/// Leaf roll at `elapsed` seconds
pub fn leaf_sway(elapsed: f32) -> f32 {
    (elapsed * 0.6).sin() * 0.05
}

pub struct HerbPlugin;

impl Plugin for HerbPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_herb)
            .add_systems(Update, (float_herb, sway_leaves));
    }
}

fn spawn_herb(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let root = commands
        .spawn((
            Transform::from_xyz(0.0, herb_height(0.0), 0.0),
            Visibility::default(),
            FloatingHerb,
            Name::new("floating_herb"),
        ))
        .id();

    // Stem
    commands.spawn((
        Mesh3d(meshes.add(ConicalFrustum {
            radius_top: 0.03,
            radius_bottom: 0.05,
            height: 0.8,
        })),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x7c, 0x3a, 0xed),
            metallic: 0.1,
            perceptual_roughness: 0.7,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.2, 0.0),
        ChildOf(root),
    ));

    let leaf_mesh = meshes.add(Rectangle::new(0.9, 0.35));
    let leaf_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x16, 0xa3, 0x4a),
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    let leaves = [
        (Vec3::new(0.12, 0.1, 0.0), 0.0, 0.9, Vec3::new(1.2, 1.2, 1.0)),
        (Vec3::new(-0.14, 0.05, 0.05), 0.0, -0.7, Vec3::new(0.95, 0.95, 1.0)),
        (Vec3::new(0.0, 0.35, 0.0), 0.0, 0.05, Vec3::new(1.4, 1.4, 1.0)),
    ];
    for (translation, pitch, yaw, scale) in leaves {
        commands.spawn((
            Mesh3d(leaf_mesh.clone()),
            MeshMaterial3d(leaf_material.clone()),
            Transform {
                translation,
                rotation: leaf_rotation(pitch, yaw, leaf_sway(0.0)),
                scale,
            },
            HerbLeaf { pitch, yaw },
            ChildOf(root),
        ));
    }

    // Pot
    commands.spawn((
        Mesh3d(meshes.add(ConicalFrustum {
            radius_top: 0.32,
            radius_bottom: 0.4,
            height: 0.24,
        })),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0xb7, 0x79, 0x1f),
            metallic: 0.05,
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.6, 0.0),
        ChildOf(root),
    ));

    // Ground travels with the herb
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(8.0, 8.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0xf8, 0xfa, 0xfc),
            metallic: 0.0,
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.72, 0.0).with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
        ChildOf(root),
    ));
}

fn leaf_rotation(pitch: f32, yaw: f32, roll: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, pitch, yaw, roll)
}

fn float_herb(time: Res<Time>, mut herbs: Query<&mut Transform, With<FloatingHerb>>) {
    let elapsed = time.elapsed_secs();
    for mut transform in &mut herbs {
        transform.rotate_y(time.delta_secs() * SPIN_SPEED);
        transform.translation.y = herb_height(elapsed);
    }
}

fn sway_leaves(time: Res<Time>, mut leaves: Query<(&HerbLeaf, &mut Transform)>) {
    let roll = leaf_sway(time.elapsed_secs());
    for (leaf, mut transform) in &mut leaves {
        transform.rotation = leaf_rotation(leaf.pitch, leaf.yaw, roll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_herb_height_range() {
        assert!((herb_height(0.0) - 0.45).abs() < 1e-6);
        let peak = herb_height(TAU / 0.8 / 4.0);
        assert!((peak - 0.63).abs() < 1e-5);
        for i in 0..100 {
            let y = herb_height(i as f32 * 0.37);
            assert!((0.27 - 1e-5..=0.63 + 1e-5).contains(&y));
        }
    }

    #[test]
    fn test_leaf_sway_is_small() {
        assert_eq!(leaf_sway(0.0), 0.0);
        for i in 0..100 {
            assert!(leaf_sway(i as f32 * 0.21).abs() <= 0.05);
        }
    }

    #[test]
    fn test_leaf_rotation_keeps_yaw() {
        let rotation = leaf_rotation(0.0, 0.9, 0.0);
        let (_, yaw, _) = rotation.to_euler(EulerRot::XYZ);
        assert!((yaw - 0.9).abs() < 1e-5);
    }
}
