use rapier3d::{
    na::{Point3, Translation3, UnitQuaternion},
    prelude::*,
};

use crate::{
    constants::{
        BOX_FRICTION, BOX_RESTITUTION, GRASS_FRICTION, LEATHER_FRICTION, LEATHER_RESTITUTION,
    },
    error::{Result, SceneError},
};

/// Collider shapes the scene knows how to build.
#[derive(Clone, Debug)]
pub enum ShapeDef {
    /// Infinite ground plane (half-space).
    ///
    /// The normal is derived from the owning body's rotation as `rotation * +Y`.
    /// `offset_along_normal` moves the surface along that normal.
    Plane { offset_along_normal: f32 },

    /// Cuboid with the given half-extents (meters).
    Cuboid { half_extents: Vector<f32> },

    /// Rigid assembly of cuboids, each placed relative to the body origin.
    Compound { parts: Vec<CuboidPart> },

    /// Convex hull of a point cloud.
    ConvexHull { points: Vec<Point3<f32>> },

    /// Sphere (meters).
    Sphere { radius: f32 },
}

/// One cuboid of a [`ShapeDef::Compound`].
#[derive(Clone, Copy, Debug)]
pub struct CuboidPart {
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub half_extents: Vector<f32>,
}

impl CuboidPart {
    pub fn new(translation: Vector<f32>, half_extents: Vector<f32>) -> Self {
        Self {
            translation,
            rotation: UnitQuaternion::identity(),
            half_extents,
        }
    }
}

/// Surface response of a collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialDef {
    pub friction: f32,
    pub restitution: f32,
}

impl MaterialDef {
    pub const fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
        }
    }

    pub const GRASS: MaterialDef = MaterialDef::new(GRASS_FRICTION, 0.0);
    pub const LEATHER: MaterialDef = MaterialDef::new(LEATHER_FRICTION, LEATHER_RESTITUTION);
    pub const PYRAMID_BOX: MaterialDef = MaterialDef::new(BOX_FRICTION, BOX_RESTITUTION);
}

impl Default for MaterialDef {
    fn default() -> Self {
        // Rapier's own defaults.
        MaterialDef::new(0.5, 0.0)
    }
}

/// Build a collider builder for `shape`, with identity local transform.
///
/// The pose comes from the parent body.
pub fn collider_from_def(shape: &ShapeDef, material: MaterialDef) -> Result<ColliderBuilder> {
    let builder = match shape {
        ShapeDef::Plane {
            offset_along_normal,
        } => {
            // Local half-space facing +Y; the parent's rotation tilts it.
            let halfspace = HalfSpace::new(Vector::y_axis());
            ColliderBuilder::new(SharedShape::new(halfspace))
                .translation(Vector::y() * *offset_along_normal)
        }

        ShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ShapeDef::Compound { parts } => {
            let shapes = parts
                .iter()
                .map(|part| {
                    let iso = Isometry::from_parts(Translation3::from(part.translation), part.rotation);
                    let h = part.half_extents;
                    (iso, SharedShape::cuboid(h.x, h.y, h.z))
                })
                .collect();
            ColliderBuilder::compound(shapes)
        }

        ShapeDef::ConvexHull { points } => {
            ColliderBuilder::convex_hull(points).ok_or(SceneError::DegenerateHull {
                points: points.len(),
            })?
        }

        ShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),
    };

    Ok(builder
        .friction(material.friction)
        .restitution(material.restitution))
}
