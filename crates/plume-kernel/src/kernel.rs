//! The closed set of solver kernels.
//!
//! Each kernel reads and writes grids through named [`Bindings`](crate::Bindings).
//! The binding contract per kernel:
//!
//! | Kernel | Grids (in / out) | Values |
//! |--------|------------------|--------|
//! | `Clear` | out `output` | `value` |
//! | `Boundary` | out `output` | |
//! | `Obstacle(kind)` | out `mask`, `obstacle_velocity` | `velocity`, shape params |
//! | `Advect` | in `velocity`, `source`, `obstacles`, optional `obstacle_velocity`; out `output` | `dt`, `modulate` |
//! | `Bfecc` | in `velocity`, `source`, `reverse`, `obstacles`; out `output` | `dt`, `modulate`, `clamp` |
//! | `Curl` | in `velocity`; out `output` | |
//! | `Confinement` | in `curl`, `obstacles`; out `output` (read-modify-write) | `coefficient`, `dt` |
//! | `External(kind, pattern)` | in `obstacles`; out `output` (read-modify-write) | `amount`, `falloff`, shape params |
//! | `Divergence` | in `velocity`, `obstacles`, `obstacle_velocity`; out `output` | |
//! | `Jacobi` | in `input0`, `input1`, `obstacles`; out `output` | `alpha`, `rbeta` |
//! | `Project` | in `velocity`, `pressure`, `obstacles`, `obstacle_velocity`; out `output` | |
//! | `Gradient` | in `source`; out `output` | |
//! | `JfaInit` | in `source`; out `output` | `threshold` |
//! | `Jfa` | in `input`; out `output` | `step` |
//!
//! Shape params are bound by [`bind_shape`](crate::bind_shape).

use std::fmt;

use plume_core::{MotorKind, ShapeKind};

/// What an external-force kernel adds inside its shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ForcePattern {
    /// Scalar injection (density).
    Scalar,
    /// Along the shape's local +Z axis.
    Direction,
    /// Radially away from the shape centre.
    Omni,
    /// Tangentially about the shape's local +Y axis.
    Vortex,
}

impl ForcePattern {
    /// Snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Direction => "direction",
            Self::Omni => "omni",
            Self::Vortex => "vortex",
        }
    }
}

impl From<MotorKind> for ForcePattern {
    fn from(kind: MotorKind) -> Self {
        match kind {
            MotorKind::Direction => Self::Direction,
            MotorKind::Omni => Self::Omni,
            MotorKind::Vortex => Self::Vortex,
        }
    }
}

/// A solver kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelId {
    /// Fill a region with a constant.
    Clear,
    /// Mark a region of the obstacle mask solid.
    Boundary,
    /// Rasterise one collider shape into the obstacle grids.
    Obstacle(ShapeKind),
    /// Semi-Lagrangian trace; a negative `dt` traces forward.
    Advect,
    /// Back-and-forth error-compensated combine.
    Bfecc,
    /// Curl of velocity.
    Curl,
    /// Vorticity confinement force.
    Confinement,
    /// Injector or motor contribution inside one shape.
    External(ShapeKind, ForcePattern),
    /// Velocity divergence.
    Divergence,
    /// One Jacobi relaxation pass.
    Jacobi,
    /// Subtract the pressure gradient.
    Project,
    /// Central-difference gradient of a scalar grid.
    Gradient,
    /// Jump-flood seed pass.
    JfaInit,
    /// One jump-flood propagation pass.
    Jfa,
}

impl fmt::Display for KernelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => f.write_str("clear"),
            Self::Boundary => f.write_str("boundary"),
            Self::Obstacle(k) => write!(f, "obstacle_{}", k.name()),
            Self::Advect => f.write_str("advect"),
            Self::Bfecc => f.write_str("bfecc"),
            Self::Curl => f.write_str("curl"),
            Self::Confinement => f.write_str("confinement"),
            Self::External(k, p) => write!(f, "external_{}_{}", k.name(), p.name()),
            Self::Divergence => f.write_str("divergence"),
            Self::Jacobi => f.write_str("jacobi"),
            Self::Project => f.write_str("project"),
            Self::Gradient => f.write_str("gradient"),
            Self::JfaInit => f.write_str("jfa_init"),
            Self::Jfa => f.write_str("jfa"),
        }
    }
}
