//! Error types for grid sizing.

use std::fmt;

/// Errors arising from [`SpatialDescriptor::compute`](crate::SpatialDescriptor::compute).
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// An axis resolves to zero dispatch tiles (non-positive or NaN size).
    DegenerateAxis {
        /// Axis name: `'x'`, `'y'` or `'z'`.
        axis: char,
        /// The requested world-space size on that axis.
        size: f32,
    },
    /// `texel_per_unit` is zero.
    ZeroTexelDensity,
    /// An axis needs more tiles than a grid may hold.
    DimensionTooLarge {
        /// Axis name.
        axis: char,
        /// Requested tile count (rounded up).
        groups: f32,
        /// Maximum tile count per axis.
        max: u32,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateAxis { axis, size } => {
                write!(f, "bounds size on axis {axis} is {size}; need a positive size")
            }
            Self::ZeroTexelDensity => write!(f, "texel_per_unit must be at least 1"),
            Self::DimensionTooLarge { axis, groups, max } => {
                write!(f, "axis {axis} needs {groups} tiles, maximum is {max}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
