//! A paced fluid volume with its own scene.
//!
//! [`FluidField`] ties a [`Simulator`] to a [`SceneRegistry`], a
//! [`FrameClock`] and a [`DeferredQueue`]. Each due tick runs, in order:
//! clock → collider velocities → solver update → commit collider
//! positions → deferred actions.

use std::fmt;
use std::time::Instant;

use glam::UVec3;
use plume_core::{Aabb, StepError};
use plume_grid::GridRole;
use plume_kernel::Backend;

use crate::clock::FrameClock;
use crate::config::{ConfigError, FieldConfig, SolverConfig};
use crate::registry::SceneRegistry;
use crate::schedule::DeferredQueue;
use crate::stepper::Simulator;

// ── MemoryReport ──────────────────────────────────────────────────

/// Grid sizes and scene counts for one field.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryReport {
    /// Grid resolution in voxels.
    pub resolution: UVec3,
    /// Bytes held by each role's grid.
    pub role_bytes: Vec<(GridRole, usize)>,
    /// Sum of `role_bytes`.
    pub total_bytes: usize,
    /// Registered injectors.
    pub injectors: usize,
    /// Registered motors.
    pub motors: usize,
    /// Registered colliders.
    pub colliders: usize,
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MIB: f64 = 1024.0 * 1024.0;
        writeln!(f, "grid resolution: {}", self.resolution)?;
        for (role, bytes) in &self.role_bytes {
            writeln!(f, "{role}: {:.2} MiB", *bytes as f64 / MIB)?;
        }
        writeln!(f, "total: {:.2} MiB", self.total_bytes as f64 / MIB)?;
        write!(
            f,
            "colliders {}, injectors {}, motors {}",
            self.colliders, self.injectors, self.motors
        )
    }
}

// ── FluidField ────────────────────────────────────────────────────

/// A fluid volume that ticks itself at a target rate.
pub struct FluidField<B> {
    config: FieldConfig,
    simulator: Simulator<B>,
    registry: SceneRegistry,
    clock: FrameClock,
    deferred: DeferredQueue,
}

impl<B: Backend> FluidField<B> {
    /// Validate `config` and allocate the field's grids.
    pub fn new(config: FieldConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;
        let simulator = Simulator::new(config.texel_per_unit, config.bounds(), backend)?;
        let clock = FrameClock::new(config.target_frame_rate, config.min_frame_rate);
        Ok(Self {
            config,
            simulator,
            registry: SceneRegistry::new(),
            clock,
            deferred: DeferredQueue::new(),
        })
    }

    /// Tick if one is due at `now`. Returns the `dt` used, or `None` when
    /// the clock says to wait.
    pub fn tick(&mut self, now: Instant) -> Result<Option<f32>, StepError> {
        let Some(dt) = self.clock.advance(now) else {
            return Ok(None);
        };
        self.step(dt)?;
        Ok(Some(dt))
    }

    /// Run one update of `dt` seconds regardless of the clock.
    ///
    /// Collider positions are committed and deferred actions run only when
    /// the update succeeds.
    pub fn step(&mut self, dt: f32) -> Result<(), StepError> {
        let inputs = self.registry.frame_inputs(dt);
        self.simulator.update(dt, &self.config.solver, &inputs)?;
        self.registry.commit_frame();
        let ran = self.deferred.drain(&mut self.registry);
        if ran > 0 {
            log::debug!("ran {ran} deferred actions after tick {}", self.simulator.current_tick());
        }
        Ok(())
    }

    /// Start the frame clock at `now` without ticking.
    pub fn start_clock(&mut self, now: Instant) {
        self.clock.reset(now);
    }
}

impl<B> FluidField<B> {
    /// World bounds a config would snap to, without allocating.
    pub fn snapped_bounds(config: &FieldConfig) -> Result<Aabb, ConfigError> {
        Ok(config.descriptor()?.bounds())
    }

    /// Queue a scene edit for after the next successful tick.
    pub fn execute_in_next_update(&mut self, action: impl FnOnce(&mut SceneRegistry) + 'static) {
        self.deferred.execute_in_next_update(action);
    }

    /// Deferred actions waiting to run.
    pub fn pending_actions(&self) -> usize {
        self.deferred.len()
    }

    /// Sizes and scene counts, for diagnostics.
    pub fn memory_report(&self) -> MemoryReport {
        let role_bytes = self.simulator.buffers().role_bytes();
        MemoryReport {
            resolution: self.simulator.resolution(),
            total_bytes: role_bytes.iter().map(|(_, b)| b).sum(),
            role_bytes,
            injectors: self.registry.injector_count(),
            motors: self.registry.motor_count(),
            colliders: self.registry.collider_count(),
        }
    }

    /// Field settings.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Solver coefficients used from the next tick on.
    pub fn solver_mut(&mut self) -> &mut SolverConfig {
        &mut self.config.solver
    }

    /// The scene.
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Mutable scene.
    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    /// The solver and its output grids.
    pub fn simulator(&self) -> &Simulator<B> {
        &self.simulator
    }

    /// Mutable solver, for seeding grids.
    pub fn simulator_mut(&mut self) -> &mut Simulator<B> {
        &mut self.simulator
    }

    /// Free the field's grids and drop pending actions.
    pub fn release(&mut self) -> Result<(), StepError> {
        self.deferred = DeferredQueue::new();
        self.simulator.release()
    }
}
