//! Solver and field configuration, validation, and error types.
//!
//! [`SolverConfig`] is the per-tick snapshot handed to
//! [`Simulator::update()`](crate::Simulator::update). [`FieldConfig`] adds the
//! sizing and frame pacing that [`FluidField`](crate::FluidField) needs.

use std::error::Error;
use std::fmt;

use glam::Vec3;
use plume_core::{Aabb, StepError};
use plume_space::{SpaceError, SpatialDescriptor};

// ── AdvectionPolicy ───────────────────────────────────────────────

/// How density is transported each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdvectionPolicy {
    /// One semi-Lagrangian backward trace.
    Back,
    /// Back-and-forth error compensation: three dispatches, sharper detail.
    #[default]
    Bfecc,
}

// ── AttachmentSettings ────────────────────────────────────────────

/// Optional post-process outputs computed after the density swap.
///
/// Attachments never feed back into the solver.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentSettings {
    /// Compute the density gradient into the gradient output.
    pub gradient: bool,
    /// Diffusion passes applied to the gradient. Default: 2.
    pub gradient_smoothing_iterations: u32,
    /// Compute the jump-flood nearest-seed field.
    pub distance_field: bool,
    /// Density at or above which a voxel seeds the distance field. Default: 0.5.
    pub distance_threshold: f32,
}

impl Default for AttachmentSettings {
    fn default() -> Self {
        Self {
            gradient: false,
            gradient_smoothing_iterations: 2,
            distance_field: false,
            distance_threshold: 0.5,
        }
    }
}

// ── SolverConfig ──────────────────────────────────────────────────

/// Solver coefficients for one tick.
///
/// Passed by reference into every update, so callers may change any field
/// between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Density transport scheme. Default: [`AdvectionPolicy::Bfecc`].
    pub advection: AdvectionPolicy,
    /// Exact number of Jacobi pressure passes. Default: 20.
    pub jacobi_iterations: u32,
    /// Vorticity confinement strength; `<= 0` skips the stage. Default: 0.1.
    pub vorticity: f32,
    /// Per-second decay applied during advection. Default: 0.1.
    pub dissipation: f32,
    /// Limit the BFECC result to the range of its source neighbourhood.
    pub bfecc_clamp: bool,
    /// Post-process outputs.
    pub attachments: AttachmentSettings,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            advection: AdvectionPolicy::Bfecc,
            jacobi_iterations: 20,
            vorticity: 0.1,
            dissipation: 0.1,
            bfecc_clamp: false,
            attachments: AttachmentSettings::default(),
        }
    }
}

impl SolverConfig {
    /// Check every coefficient is usable.
    ///
    /// Vorticity may be any finite value. Dissipation must be finite and
    /// non-negative so that the per-tick scale `1 / (1 + dissipation * dt)`
    /// never exceeds one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.vorticity.is_finite() {
            return Err(ConfigError::InvalidCoefficient {
                name: "vorticity",
                value: self.vorticity,
            });
        }
        if !self.dissipation.is_finite() || self.dissipation < 0.0 {
            return Err(ConfigError::InvalidCoefficient {
                name: "dissipation",
                value: self.dissipation,
            });
        }
        if !self.attachments.distance_threshold.is_finite() {
            return Err(ConfigError::InvalidCoefficient {
                name: "distance_threshold",
                value: self.attachments.distance_threshold,
            });
        }
        Ok(())
    }
}

// ── FieldConfig ───────────────────────────────────────────────────

/// Sizing, pacing and solver settings for a [`FluidField`](crate::FluidField).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Voxels per world unit. Default: 16.
    pub texel_per_unit: u32,
    /// World-space minimum corner.
    pub origin: Vec3,
    /// World-space extent. Default: one unit cube.
    pub size: Vec3,
    /// Ticks per second the field aims for. Default: 30.
    pub target_frame_rate: f32,
    /// Lowest simulated rate; caps `dt` at `1 / min_frame_rate`. Default: 16.
    pub min_frame_rate: f32,
    /// Solver coefficients, snapshotted into every tick.
    pub solver: SolverConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            texel_per_unit: 16,
            origin: Vec3::ZERO,
            size: Vec3::ONE,
            target_frame_rate: 30.0,
            min_frame_rate: 16.0,
            solver: SolverConfig::default(),
        }
    }
}

impl FieldConfig {
    /// The requested world bounds before tile rounding.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_min_size(self.origin, self.size)
    }

    /// Grid sizing these settings produce, without allocating anything.
    pub fn descriptor(&self) -> Result<SpatialDescriptor, ConfigError> {
        Ok(SpatialDescriptor::compute(self.bounds(), self.texel_per_unit)?)
    }

    /// Check sizing, frame rates and solver coefficients.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.descriptor()?;
        let rates_ok = self.target_frame_rate.is_finite()
            && self.min_frame_rate.is_finite()
            && self.min_frame_rate > 0.0
            && self.target_frame_rate >= self.min_frame_rate;
        if !rates_ok {
            return Err(ConfigError::InvalidFrameRate {
                target: self.target_frame_rate,
                min: self.min_frame_rate,
            });
        }
        self.solver.validate()
    }
}

// ── ConfigError ───────────────────────────────────────────────────

/// Errors detected while validating configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid sizing failed.
    Space(SpaceError),
    /// A solver coefficient is outside its valid range.
    InvalidCoefficient {
        /// Setting name.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// Frame rates are non-finite, non-positive, or target < min.
    InvalidFrameRate {
        /// Configured target rate.
        target: f32,
        /// Configured minimum rate.
        min: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "grid sizing: {e}"),
            Self::InvalidCoefficient { name, value } => {
                write!(f, "{name} must be finite, got {value}")
            }
            Self::InvalidFrameRate { target, min } => write!(
                f,
                "frame rates must be positive with target >= min, got target {target} min {min}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<ConfigError> for StepError {
    fn from(e: ConfigError) -> Self {
        StepError::InvalidConfig {
            reason: e.to_string(),
        }
    }
}
