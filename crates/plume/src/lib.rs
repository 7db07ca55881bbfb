//! Plume: real-time grid-based incompressible smoke and fluid volumes.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Plume sub-crates. For most users, adding `plume` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use plume::prelude::*;
//!
//! // A unit cube at 16 voxels per unit: a 16³ grid.
//! let config = FieldConfig::default();
//! let mut field = FluidField::new(config, CpuBackend::new()).unwrap();
//!
//! field
//!     .registry_mut()
//!     .add_injector(Injector::new(Shape::sphere(Vec3::splat(0.5), 0.2), 2.0));
//! field
//!     .registry_mut()
//!     .add_motor(Motor::new(Shape::sphere(Vec3::splat(0.5), 0.3), MotorKind::Omni, 1.0));
//!
//! field.step(1.0 / 30.0).unwrap();
//! field.step(1.0 / 30.0).unwrap();
//!
//! let sim = field.simulator();
//! assert_eq!(sim.current_tick(), TickId(2));
//! assert!(sim.density().unwrap().sum() > 0.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `plume-core` | IDs, bounds, shape and motor kinds, errors |
//! | [`space`] | `plume-space` | Grid sizing, shapes, shape placement |
//! | [`grid`] | `plume-grid` | Grids, roles, the buffer set |
//! | [`kernel`] | `plume-kernel` | Kernel ids, bindings, backend trait, dispatcher |
//! | [`kernels`] | `plume-kernels` | CPU kernel implementations |
//! | [`engine`] | `plume-engine` | Solver pipeline, scene registry, frame pacing |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and errors (`plume-core`).
///
/// Contains [`types::Aabb`], [`types::TickId`], shape and motor kinds, and
/// the [`types::StepError`] returned by every solver operation.
pub use plume_core as types;

/// Grid sizing and shape placement (`plume-space`).
///
/// [`space::SpatialDescriptor`] turns world bounds into a tile-aligned grid;
/// [`space::ShapeEvaluator`] maps [`space::Shape`]s onto it.
pub use plume_space as space;

/// Grid storage (`plume-grid`).
///
/// One [`grid::Grid`] per [`grid::GridRole`], owned by a
/// [`grid::GridBufferSet`].
pub use plume_grid as grid;

/// Kernel vocabulary and dispatch (`plume-kernel`).
///
/// The [`kernel::Backend`] trait is the extension point for alternative
/// executors.
pub use plume_kernel as kernel;

/// CPU kernel implementations (`plume-kernels`).
pub use plume_kernels as kernels;

/// Solver orchestration (`plume-engine`).
///
/// [`engine::Simulator`] for explicit stepping, [`engine::FluidField`] for
/// a self-paced volume with its own scene.
pub use plume_engine as engine;

/// Common imports for typical Plume usage.
///
/// ```rust
/// use plume::prelude::*;
/// ```
///
/// This imports the field and solver types, scene inputs, shapes, the CPU
/// backend, and the error types.
pub mod prelude {
    // Core types
    pub use plume_core::{Aabb, MotorKind, Quat, ShapeKind, TickId, UVec3, Vec3};

    // Errors
    pub use plume_core::{DispatchError, StepError};
    pub use plume_engine::ConfigError;

    // Space
    pub use plume_space::{Shape, SpatialDescriptor};

    // Grids
    pub use plume_grid::{Grid, GridRole};

    // Kernels
    pub use plume_kernel::Backend;
    pub use plume_kernels::CpuBackend;

    // Engine
    pub use plume_engine::{
        AdvectionPolicy, Collider, FieldConfig, FluidField, FrameInputs, Injector, Motor,
        SceneRegistry, Simulator, SolverConfig, StepMetrics,
    };
}
