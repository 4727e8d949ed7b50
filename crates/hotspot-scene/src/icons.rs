//! Procedural icon geometry
//!
//! Each `ProceduralShape` is a small table of primitive parts. The tables are
//! plain data so they can be checked without a render world.

use bevy::prelude::*;
use hotspot_core::ProceduralShape;
use std::f32::consts::FRAC_PI_2;

/// Primitive mesh for one icon part
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartMesh {
    Cuboid(Vec3),
    /// Flat quad in the XY plane
    Rectangle(Vec2),
    Cylinder { radius: f32, height: f32 },
    Frustum { radius_top: f32, radius_bottom: f32, height: f32 },
    /// Ring facing +Z
    Torus { minor_radius: f32, major_radius: f32 },
}

impl PartMesh {
    pub fn mesh(&self) -> Mesh {
        match *self {
            PartMesh::Cuboid(size) => Mesh::from(Cuboid::new(size.x, size.y, size.z)),
            PartMesh::Rectangle(size) => Mesh::from(Rectangle::new(size.x, size.y)),
            PartMesh::Cylinder { radius, height } => Mesh::from(Cylinder::new(radius, height)),
            PartMesh::Frustum {
                radius_top,
                radius_bottom,
                height,
            } => Mesh::from(ConicalFrustum {
                radius_top,
                radius_bottom,
                height,
            }),
            PartMesh::Torus {
                minor_radius,
                major_radius,
            } => Mesh::from(Torus {
                minor_radius,
                major_radius,
            }),
        }
    }

    /// Flat parts are visible from both sides
    pub fn is_flat(&self) -> bool {
        matches!(self, PartMesh::Rectangle(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconPart {
    pub mesh: PartMesh,
    pub transform: Transform,
    pub color: Color,
}

fn part(mesh: PartMesh, translation: Vec3, euler: Vec3, color: Color) -> IconPart {
    IconPart {
        mesh,
        transform: Transform::from_translation(translation)
            .with_rotation(Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)),
        color,
    }
}

/// Parts making up `shape`, relative to the hotspot origin
pub fn shape_parts(shape: ProceduralShape) -> Vec<IconPart> {
    match shape {
        ProceduralShape::Leaf => {
            let leaf_green = Color::srgb_u8(0x16, 0xa3, 0x4a);
            vec![
                part(
                    PartMesh::Cuboid(Vec3::new(0.02, 0.4, 0.02)),
                    Vec3::ZERO,
                    Vec3::new(0.0, 0.2, -0.2),
                    Color::srgb_u8(0x15, 0x80, 0x3d),
                ),
                part(
                    PartMesh::Rectangle(Vec2::new(0.24, 0.12)),
                    Vec3::new(0.12, 0.12, 0.0),
                    Vec3::new(0.0, 0.6, -0.4),
                    leaf_green,
                ),
                part(
                    PartMesh::Rectangle(Vec2::new(0.18, 0.09)),
                    Vec3::new(-0.12, 0.06, 0.0),
                    Vec3::new(0.0, -0.6, 0.3),
                    leaf_green,
                ),
            ]
        }
        ProceduralShape::Mortar => vec![
            part(
                PartMesh::Frustum {
                    radius_top: 0.18,
                    radius_bottom: 0.28,
                    height: 0.12,
                },
                Vec3::ZERO,
                Vec3::ZERO,
                Color::srgb_u8(0xa1, 0x62, 0x07),
            ),
            part(
                PartMesh::Cylinder {
                    radius: 0.14,
                    height: 0.02,
                },
                Vec3::new(0.0, -0.02, 0.0),
                Vec3::ZERO,
                Color::srgb_u8(0x7c, 0x2d, 0x12),
            ),
            // Pestle
            part(
                PartMesh::Cylinder {
                    radius: 0.03,
                    height: 0.34,
                },
                Vec3::new(0.06, 0.08, 0.02),
                Vec3::new(0.3, 0.0, 0.4),
                Color::srgb_u8(0x6b, 0x4f, 0x1d),
            ),
        ],
        ProceduralShape::Calendar => {
            let binding = Color::srgb_u8(0xb4, 0x53, 0x09);
            let ring = Color::srgb_u8(0x92, 0x40, 0x0e);
            // Bevy tori lie in XZ; stand the rings up to face the viewer
            let upright = Vec3::new(FRAC_PI_2, 0.0, 0.0);
            let ring_mesh = PartMesh::Torus {
                minor_radius: 0.01,
                major_radius: 0.04,
            };
            vec![
                part(
                    PartMesh::Cuboid(Vec3::new(0.36, 0.26, 0.04)),
                    Vec3::ZERO,
                    Vec3::ZERO,
                    Color::srgb_u8(0xfd, 0xe6, 0x8a),
                ),
                part(
                    PartMesh::Rectangle(Vec2::new(0.02, 0.18)),
                    Vec3::new(-0.07, 0.0, 0.023),
                    Vec3::ZERO,
                    binding,
                ),
                part(
                    PartMesh::Rectangle(Vec2::new(0.02, 0.18)),
                    Vec3::new(0.07, 0.0, 0.023),
                    Vec3::ZERO,
                    binding,
                ),
                part(
                    PartMesh::Rectangle(Vec2::new(0.22, 0.02)),
                    Vec3::new(0.0, -0.05, 0.023),
                    Vec3::ZERO,
                    binding,
                ),
                part(ring_mesh, Vec3::new(-0.09, 0.13, 0.0), upright, ring),
                part(ring_mesh, Vec3::new(0.09, 0.13, 0.0), upright, ring),
            ]
        }
    }
}

/// Spawn the parts of `shape` as children of `parent`
pub fn spawn_icon(
    commands: &mut Commands,
    parent: Entity,
    shape: ProceduralShape,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    for part in shape_parts(shape) {
        let mut material = StandardMaterial {
            base_color: part.color,
            perceptual_roughness: 0.8,
            ..default()
        };
        if part.mesh.is_flat() {
            material.double_sided = true;
            material.cull_mode = None;
        }

        commands.spawn((
            Mesh3d(meshes.add(part.mesh.mesh())),
            MeshMaterial3d(materials.add(material)),
            part.transform,
            ChildOf(parent),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotspot_core::IconKind;

    #[test]
    fn test_part_counts() {
        assert_eq!(shape_parts(ProceduralShape::Leaf).len(), 3);
        assert_eq!(shape_parts(ProceduralShape::Mortar).len(), 3);
        assert_eq!(shape_parts(ProceduralShape::Calendar).len(), 6);
    }

    #[test]
    fn test_unknown_icon_draws_leaf() {
        let shape = IconKind::parse("lotus").procedural_shape();
        assert_eq!(shape_parts(shape), shape_parts(ProceduralShape::Leaf));
    }

    #[test]
    fn test_calendar_rings_stand_upright() {
        let parts = shape_parts(ProceduralShape::Calendar);
        let rings: Vec<&IconPart> = parts
            .iter()
            .filter(|p| matches!(p.mesh, PartMesh::Torus { .. }))
            .collect();
        assert_eq!(rings.len(), 2);

        for ring in rings {
            // Ring axis (local Y) now points along Z
            let axis = ring.transform.rotation * Vec3::Y;
            assert!((axis - Vec3::Z).length() < 1e-5, "axis {:?}", axis);
            assert!((ring.transform.translation.y - 0.13).abs() < 1e-6);
        }
    }

    #[test]
    fn test_only_planes_are_flat() {
        let flat: usize = [
            ProceduralShape::Leaf,
            ProceduralShape::Mortar,
            ProceduralShape::Calendar,
        ]
        .into_iter()
        .map(|s| shape_parts(s).iter().filter(|p| p.mesh.is_flat()).count())
        .sum();
        assert_eq!(flat, 2 + 3);
    }
}
