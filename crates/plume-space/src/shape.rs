//! Analytic shapes placed in world space.

use glam::{Mat4, Quat, Vec3};
use plume_core::{Aabb, ShapeKind};

/// Sphere in its own local frame, placed by `local_to_world`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// Local-space centre.
    pub center: Vec3,
    /// Local-space radius.
    pub radius: f32,
    /// Placement in the world.
    pub local_to_world: Mat4,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.5,
            local_to_world: Mat4::IDENTITY,
        }
    }
}

/// Axis-aligned box in its own local frame, placed by `local_to_world`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    /// Local-space centre.
    pub center: Vec3,
    /// Local-space edge lengths.
    pub size: Vec3,
    /// Placement in the world.
    pub local_to_world: Mat4,
}

impl Default for Cuboid {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec3::ONE,
            local_to_world: Mat4::IDENTITY,
        }
    }
}

/// A solver shape: obstacle, injector, motor or collider volume.
///
/// Closed set; each variant maps to one [`ShapeKind`] and one set of
/// kernel variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Ellipsoid after transformation.
    Sphere(Sphere),
    /// Oriented box after transformation.
    Box(Cuboid),
}

impl Shape {
    /// Sphere of `radius` centred at world point `center`.
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere(Sphere {
            center: Vec3::ZERO,
            radius,
            local_to_world: Mat4::from_translation(center),
        })
    }

    /// Box of `size` centred at world point `center`, rotated by `rotation`.
    pub fn cuboid(center: Vec3, size: Vec3, rotation: Quat) -> Self {
        Self::Box(Cuboid {
            center: Vec3::ZERO,
            size,
            local_to_world: Mat4::from_rotation_translation(rotation, center),
        })
    }

    /// Classification used to pick kernel variants.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Sphere(_) => ShapeKind::Sphere,
            Self::Box(_) => ShapeKind::Box,
        }
    }

    /// Local-to-world placement.
    pub fn local_to_world(&self) -> Mat4 {
        match self {
            Self::Sphere(s) => s.local_to_world,
            Self::Box(b) => b.local_to_world,
        }
    }

    /// Replace the placement, keeping local parameters.
    pub fn set_local_to_world(&mut self, m: Mat4) {
        match self {
            Self::Sphere(s) => s.local_to_world = m,
            Self::Box(b) => b.local_to_world = m,
        }
    }

    /// Local centre and full edge lengths of the shape's unit frame.
    fn local_frame(&self) -> (Vec3, Vec3) {
        match self {
            Self::Sphere(s) => (s.center, Vec3::splat(s.radius * 2.0)),
            Self::Box(b) => (b.center, b.size),
        }
    }

    /// Maps the unit cube `[-0.5, 0.5]³` onto the shape in world space.
    pub fn unit_to_world(&self) -> Mat4 {
        let (center, size) = self.local_frame();
        self.local_to_world() * Mat4::from_scale_rotation_translation(size, Quat::IDENTITY, center)
    }

    /// World-space bounding box over the eight transformed corners of the
    /// shape's local box.
    pub fn bounds(&self) -> Aabb {
        let m = self.unit_to_world();
        let corners = (0..8).map(|i| {
            let c = Vec3::new(
                if i & 1 == 0 { -0.5 } else { 0.5 },
                if i & 2 == 0 { -0.5 } else { 0.5 },
                if i & 4 == 0 { -0.5 } else { 0.5 },
            );
            m.transform_point3(c)
        });
        // Eight corners are always present.
        Aabb::from_points(corners).unwrap_or(Aabb::new(Vec3::ZERO, Vec3::ZERO))
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Self::Sphere(s)
    }
}

impl From<Cuboid> for Shape {
    fn from(b: Cuboid) -> Self {
        Self::Box(b)
    }
}
