//! Shape, motor, and grid-format classifications.

use std::fmt;

/// Primitive kind of a shape.
///
/// Every shape-driven kernel (obstacle rasterization, density injection,
/// velocity motors) has one variant per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    /// An ellipsoid: a unit sphere scaled by the shape transform.
    Sphere,
    /// An oriented box.
    Box,
}

impl ShapeKind {
    /// All shape kinds, in capability-table order.
    pub const ALL: [ShapeKind; 2] = [ShapeKind::Sphere, ShapeKind::Box];

    /// Position of this kind in [`ShapeKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Sphere => 0,
            Self::Box => 1,
        }
    }

    /// Short lowercase name used in kernel names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Force pattern applied by a motor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MotorKind {
    /// Uniform push along the shape's local forward (+Z) axis.
    Direction,
    /// Radial push away from the shape centre.
    Omni,
    /// Tangential push around the shape's local up (+Y) axis.
    Vortex,
}

impl MotorKind {
    /// Short lowercase name used in kernel names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Direction => "direction",
            Self::Omni => "omni",
            Self::Vortex => "vortex",
        }
    }
}

impl fmt::Display for MotorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-voxel storage layout of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridFormat {
    /// One `f32` per voxel.
    Scalar,
    /// Three `f32` per voxel (x, y, z).
    Vector,
}

impl GridFormat {
    /// Number of `f32` storage slots per voxel.
    pub fn components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vector => 3,
        }
    }
}

impl fmt::Display for GridFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Vector => f.write_str("vector"),
        }
    }
}
