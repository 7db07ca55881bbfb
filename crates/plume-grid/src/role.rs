//! Logical grid roles.

use std::fmt;

use plume_core::GridFormat;

/// What a grid slot currently means to the solver.
///
/// Each role points at exactly one physical slot. Swapping two roles
/// exchanges their slots; the voxel data stays where it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridRole {
    /// Current density, exposed to rendering.
    Density,
    /// Density written by this tick's advection.
    DensityNext,
    /// Current velocity, in voxels per second.
    Velocity,
    /// Velocity scratch; also the attachment scratch.
    VelocityNext,
    /// Pressure solution.
    Pressure,
    /// Scalar scratch: divergence, Jacobi ping-pong, BFECC intermediate.
    TempScalar,
    /// Vector scratch: curl during the tick, density gradient afterwards.
    TempVector,
    /// Obstacle mask, 0 = fluid, 1 = solid.
    Obstacles,
    /// Obstacle velocity in voxels per second.
    ObstacleVelocity,
    /// Jump-flood nearest-seed coordinates.
    DistanceField,
}

impl GridRole {
    /// Number of roles (and slots).
    pub const COUNT: usize = 10;

    /// Every role, in slot-allocation order.
    pub const ALL: [GridRole; Self::COUNT] = [
        Self::Density,
        Self::DensityNext,
        Self::Velocity,
        Self::VelocityNext,
        Self::Pressure,
        Self::TempScalar,
        Self::TempVector,
        Self::Obstacles,
        Self::ObstacleVelocity,
        Self::DistanceField,
    ];

    /// Position in [`GridRole::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Per-voxel format of the grid this role was allocated with.
    pub fn format(self) -> GridFormat {
        match self {
            Self::Density
            | Self::DensityNext
            | Self::Pressure
            | Self::TempScalar
            | Self::Obstacles => GridFormat::Scalar,
            Self::Velocity
            | Self::VelocityNext
            | Self::TempVector
            | Self::ObstacleVelocity
            | Self::DistanceField => GridFormat::Vector,
        }
    }

    /// Snake-case name used in logs and memory reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::DensityNext => "density_next",
            Self::Velocity => "velocity",
            Self::VelocityNext => "velocity_next",
            Self::Pressure => "pressure",
            Self::TempScalar => "temp_scalar",
            Self::TempVector => "temp_vector",
            Self::Obstacles => "obstacles",
            Self::ObstacleVelocity => "obstacle_velocity",
            Self::DistanceField => "distance_field",
        }
    }
}

impl fmt::Display for GridRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
