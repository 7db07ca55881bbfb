//! Error types for the Plume solver.
//!
//! Organised by subsystem: kernel dispatch ([`DispatchError`]) and the
//! per-tick stepper ([`StepError`]). Construction-time errors live with the
//! crates that detect them (`SpaceError`, `GridError`, `ConfigError`).

use std::error::Error;
use std::fmt;

use glam::UVec3;

use crate::id::SlotIndex;
use crate::kind::GridFormat;

/// Why a backend refused a kernel dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchFailure {
    /// The backend has no implementation for the kernel.
    UnknownKernel,
    /// A binding the kernel requires was not supplied.
    MissingBinding {
        /// Binding name, e.g. `"input0"`.
        name: String,
    },
    /// A binding was supplied with the wrong kind of value.
    BindingMismatch {
        /// Binding name.
        name: String,
        /// What the kernel expected (e.g. `"float"`).
        expected: &'static str,
        /// What the caller bound.
        found: &'static str,
    },
    /// A grid binding has the wrong per-voxel format.
    FormatMismatch {
        /// Binding name.
        name: String,
        /// Format the kernel expected.
        expected: GridFormat,
        /// Format of the bound grid.
        found: GridFormat,
    },
    /// The same slot was bound both as an input and as an output.
    AliasedOutput {
        /// The doubly-bound slot.
        slot: SlotIndex,
    },
    /// A binding referenced a slot that does not exist.
    UnknownSlot {
        /// The missing slot.
        slot: SlotIndex,
    },
    /// The dispatch region has a zero extent on some axis.
    EmptyRegion,
    /// The dispatch region reaches outside the grid.
    RegionOutOfRange {
        /// Region offset in voxels.
        offset: UVec3,
        /// Grid resolution.
        resolution: UVec3,
    },
    /// Backend-specific failure.
    Backend {
        /// Human-readable description.
        reason: String,
    },
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKernel => write!(f, "unknown kernel"),
            Self::MissingBinding { name } => write!(f, "missing binding '{name}'"),
            Self::BindingMismatch {
                name,
                expected,
                found,
            } => write!(f, "binding '{name}' expected {expected}, found {found}"),
            Self::FormatMismatch {
                name,
                expected,
                found,
            } => write!(f, "grid '{name}' expected {expected} format, found {found}"),
            Self::AliasedOutput { slot } => {
                write!(f, "slot {slot} bound as both input and output")
            }
            Self::UnknownSlot { slot } => write!(f, "slot {slot} does not exist"),
            Self::EmptyRegion => write!(f, "dispatch region is empty"),
            Self::RegionOutOfRange { offset, resolution } => write!(
                f,
                "region at offset {offset} exceeds grid resolution {resolution}"
            ),
            Self::Backend { reason } => write!(f, "backend failure: {reason}"),
        }
    }
}

impl Error for DispatchFailure {}

/// A fatal kernel dispatch failure.
///
/// Carries the kernel name and the requested extent so a failed tick can be
/// diagnosed without reproducing it. Never retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchError {
    /// Name of the kernel that was rejected.
    pub kernel: String,
    /// Requested extent in voxels.
    pub extent: UVec3,
    /// The backend's reason.
    pub failure: DispatchFailure,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dispatch of kernel '{}' over {}x{}x{} voxels failed: {}",
            self.kernel, self.extent.x, self.extent.y, self.extent.z, self.failure
        )
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.failure)
    }
}

/// Errors from `Simulator::update()` and the grid accessors.
///
/// Every variant except [`StepError::Dispatch`] is detected before the
/// first dispatch of the tick, so no grid has been touched.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The solver configuration snapshot is invalid.
    InvalidConfig {
        /// Description of the invalid setting.
        reason: String,
    },
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidDt {
        /// The rejected value.
        value: f32,
    },
    /// The collider velocity list does not match the collider list.
    ColliderVelocityMismatch {
        /// Number of colliders.
        colliders: usize,
        /// Number of velocities.
        velocities: usize,
    },
    /// A kernel dispatch was rejected by the backend.
    Dispatch(DispatchError),
    /// The simulator's grids were released.
    UseAfterRelease,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid solver config: {reason}"),
            Self::InvalidDt { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::ColliderVelocityMismatch {
                colliders,
                velocities,
            } => write!(
                f,
                "{colliders} colliders but {velocities} collider velocities"
            ),
            Self::Dispatch(e) => write!(f, "{e}"),
            Self::UseAfterRelease => write!(f, "simulator grids have been released"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Dispatch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DispatchError> for StepError {
    fn from(e: DispatchError) -> Self {
        Self::Dispatch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_error_names_kernel_and_extent() {
        let e = DispatchError {
            kernel: "jacobi".into(),
            extent: UVec3::new(64, 32, 16),
            failure: DispatchFailure::UnknownKernel,
        };
        let msg = e.to_string();
        assert!(msg.contains("jacobi"));
        assert!(msg.contains("64x32x16"));
        assert!(e.source().is_some());
    }

    #[test]
    fn step_error_wraps_dispatch() {
        let e: StepError = DispatchError {
            kernel: "curl".into(),
            extent: UVec3::ONE,
            failure: DispatchFailure::MissingBinding {
                name: "input0".into(),
            },
        }
        .into();
        assert!(matches!(e, StepError::Dispatch(_)));
        assert!(e.to_string().contains("input0"));
    }
}
