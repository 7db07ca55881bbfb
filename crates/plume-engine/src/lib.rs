//! Solver orchestration for Plume fluid volumes.
//!
//! [`Simulator`] runs the fixed per-tick pipeline (obstacles, advection,
//! vorticity, external forces, pressure projection, density swap,
//! attachments) over a `GridBufferSet` through a `KernelDispatcher`.
//! [`FluidField`] layers scene management, frame pacing and deferred
//! actions on top.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod field;
pub mod inputs;
pub mod metrics;
pub mod registry;
pub mod schedule;
pub mod stepper;

pub use clock::FrameClock;
pub use config::{AdvectionPolicy, AttachmentSettings, ConfigError, FieldConfig, SolverConfig};
pub use field::{FluidField, MemoryReport};
pub use inputs::{Collider, FrameInputs, Injector, Motor};
pub use metrics::StepMetrics;
pub use registry::{ColliderId, InjectorId, MotorId, SceneRegistry};
pub use schedule::DeferredQueue;
pub use stepper::{Simulator, FORCE_FALLOFF};
