//! The per-tick solver pipeline.
//!
//! [`Simulator`] owns the grid sizing, the grid set and the kernel
//! dispatcher, and runs the fixed stage order on every
//! [`update()`](Simulator::update):
//!
//! 1. obstacles: walls and collider shapes into the mask
//! 2. advection: velocity, then density (`Back` or `Bfecc`)
//! 3. vorticity confinement (skipped when the coefficient is `<= 0`)
//! 4. external forces: injectors into density, motors into velocity
//! 5. pressure projection: divergence, Jacobi passes, gradient subtraction
//! 6. density swap
//! 7. attachments: gradient and distance field, when enabled
//!
//! Every check that can reject an update runs before the first dispatch.
//! An update that fails in a dispatch leaves the previous density current
//! and does not advance the tick: a failure in an attachment swaps the new
//! density back out. Velocity and scratch grids may hold partial results.
//!
//! With zero Jacobi passes the pressure stays zero and projection reduces
//! to a buffer swap, so velocity is not touched beyond the forces.

use std::time::Instant;

use glam::UVec3;
use plume_core::{Aabb, StepError, TickId};
use plume_grid::{Grid, GridBufferSet, GridRole};
use plume_kernel::{bind_shape, capability, Backend, Bindings, ForcePattern, KernelDispatcher, KernelId};
use plume_space::{Shape, ShapeEvaluator, ShapeParameters, SpatialDescriptor, VoxelBox};

use crate::config::{AdvectionPolicy, ConfigError, SolverConfig};
use crate::inputs::FrameInputs;
use crate::metrics::StepMetrics;

/// Radial falloff exponent for injector and motor weights.
pub const FORCE_FALLOFF: f32 = 2.4;

// ── StageTimer ────────────────────────────────────────────────────

struct StageTimer {
    last: Instant,
    stage_us: Vec<(&'static str, u64)>,
}

impl StageTimer {
    fn start() -> Self {
        Self {
            last: Instant::now(),
            stage_us: Vec::with_capacity(7),
        }
    }

    fn mark(&mut self, stage: &'static str) {
        let now = Instant::now();
        self.stage_us
            .push((stage, now.duration_since(self.last).as_micros() as u64));
        self.last = now;
    }
}

// ── Simulator ─────────────────────────────────────────────────────

/// A fixed-resolution fluid volume and the pipeline that advances it.
///
/// ```
/// use plume_core::{Aabb, Vec3};
/// use plume_engine::{FrameInputs, Simulator, SolverConfig};
/// use plume_kernels::CpuBackend;
///
/// let bounds = Aabb::from_min_size(Vec3::ZERO, Vec3::ONE);
/// let mut sim = Simulator::new(8, bounds, CpuBackend::new()).unwrap();
/// sim.update(1.0 / 30.0, &SolverConfig::default(), &FrameInputs::new())
///     .unwrap();
/// assert_eq!(sim.current_tick().0, 1);
/// assert_eq!(sim.density().unwrap().sum(), 0.0);
/// ```
pub struct Simulator<B> {
    descriptor: SpatialDescriptor,
    evaluator: ShapeEvaluator,
    grids: GridBufferSet,
    dispatcher: KernelDispatcher<B>,
    current_tick: TickId,
    last_metrics: StepMetrics,
}

impl<B: Backend> Simulator<B> {
    /// Size the grid for `bounds` at `texel_per_unit` and allocate every
    /// buffer, zeroed.
    pub fn new(texel_per_unit: u32, bounds: Aabb, backend: B) -> Result<Self, ConfigError> {
        let descriptor = SpatialDescriptor::compute(bounds, texel_per_unit)?;
        let grids = GridBufferSet::new(descriptor.resolution());
        log::debug!(
            "allocated {} grid on backend '{}': {} bytes",
            descriptor.resolution(),
            backend.name(),
            grids.memory_bytes()
        );
        Ok(Self {
            evaluator: ShapeEvaluator::new(descriptor),
            descriptor,
            grids,
            dispatcher: KernelDispatcher::new(backend),
            current_tick: TickId::default(),
            last_metrics: StepMetrics::default(),
        })
    }

    /// Advance the fluid by `dt` seconds.
    ///
    /// `config` and `inputs` are read for this call only. On error nothing
    /// is published: validation failures leave every grid untouched, and a
    /// dispatch failure aborts before the density swap.
    pub fn update(
        &mut self,
        dt: f32,
        config: &SolverConfig,
        inputs: &FrameInputs,
    ) -> Result<(), StepError> {
        let tick_start = Instant::now();

        // 0. Validate before the first dispatch.
        if self.grids.is_released() {
            return Err(StepError::UseAfterRelease);
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(StepError::InvalidDt { value: dt });
        }
        config.validate()?;
        if inputs.colliders.len() != inputs.collider_velocities.len() {
            return Err(StepError::ColliderVelocityMismatch {
                colliders: inputs.colliders.len(),
                velocities: inputs.collider_velocities.len(),
            });
        }

        let dispatches_before = self.dispatcher.total();
        let mut metrics = StepMetrics::default();
        let mut timer = StageTimer::start();

        // 1. Obstacles.
        self.stamp_obstacles(inputs, &mut metrics)?;
        timer.mark("obstacles");

        // 2. Advection.
        self.advect(dt, config)?;
        timer.mark("advection");

        // 3. Vorticity confinement.
        if config.vorticity > 0.0 {
            self.confine_vorticity(dt, config.vorticity)?;
            timer.mark("vorticity");
        }

        // 4. External forces.
        self.apply_externals(dt, inputs, &mut metrics)?;
        timer.mark("externals");

        // 5. Pressure projection.
        metrics.jacobi_passes = self.project(config.jacobi_iterations)?;
        timer.mark("projection");

        // 6. Publish density.
        self.grids.swap(GridRole::Density, GridRole::DensityNext)?;

        // 7. Attachments.
        let attachments = &config.attachments;
        if let Err(e) = self.run_attachments(dt, config, &mut metrics) {
            self.grids.swap(GridRole::Density, GridRole::DensityNext)?;
            return Err(e);
        }
        if attachments.gradient || attachments.distance_field {
            timer.mark("attachments");
        }

        self.current_tick = self.current_tick.next();
        metrics.stage_us = timer.stage_us;
        metrics.dispatches = self.dispatcher.total() - dispatches_before;
        metrics.memory_bytes = self.grids.memory_bytes();
        metrics.total_us = tick_start.elapsed().as_micros() as u64;
        log::debug!(
            "tick {} done in {}us: {} dispatches, {} shapes skipped",
            self.current_tick,
            metrics.total_us,
            metrics.dispatches,
            metrics.skipped_shapes
        );
        self.last_metrics = metrics;
        Ok(())
    }

    // ── Stages ────────────────────────────────────────────────────

    fn stamp_obstacles(
        &mut self,
        inputs: &FrameInputs,
        metrics: &mut StepMetrics,
    ) -> Result<(), StepError> {
        let full = self.full();
        self.clear(GridRole::ObstacleVelocity, full)?;
        self.clear(GridRole::Obstacles, full)?;

        let walls = Bindings::new().with_output("output", self.slot(GridRole::Obstacles));
        for face in VoxelBox::faces(self.resolution()) {
            self.run(KernelId::Boundary, &walls, face)?;
        }

        let tpu = self.texel_per_unit();
        for (collider, &velocity) in inputs.colliders.iter().zip(&inputs.collider_velocities) {
            let Some((params, region)) = self.place(&collider.shape, metrics) else {
                continue;
            };
            let bindings = bind_shape(
                &params,
                Bindings::new()
                    .with_output("mask", self.slot(GridRole::Obstacles))
                    .with_output("obstacle_velocity", self.slot(GridRole::ObstacleVelocity))
                    .with_vec3("velocity", velocity * tpu),
            );
            self.run(capability(params.kind).obstacle_kernel(), &bindings, region)?;
        }
        Ok(())
    }

    fn advect(&mut self, dt: f32, config: &SolverConfig) -> Result<(), StepError> {
        let full = self.full();
        let decay = 1.0 / (1.0 + config.dissipation * dt);

        let velocity = self
            .trace(GridRole::Velocity, GridRole::VelocityNext, dt, decay)
            .with_input("obstacle_velocity", self.slot(GridRole::ObstacleVelocity));
        self.run(KernelId::Advect, &velocity, full)?;

        match config.advection {
            AdvectionPolicy::Back => {
                let density = self.trace(GridRole::Density, GridRole::DensityNext, dt, decay);
                self.run(KernelId::Advect, &density, full)?;
            }
            AdvectionPolicy::Bfecc => {
                let forward = self.trace(GridRole::Density, GridRole::TempVector, dt, 1.0);
                self.run(KernelId::Advect, &forward, full)?;
                let reverse = self.trace(GridRole::TempVector, GridRole::TempScalar, -dt, 1.0);
                self.run(KernelId::Advect, &reverse, full)?;
                let combine = Bindings::new()
                    .with_input("velocity", self.slot(GridRole::Velocity))
                    .with_input("source", self.slot(GridRole::Density))
                    .with_input("reverse", self.slot(GridRole::TempScalar))
                    .with_input("obstacles", self.slot(GridRole::Obstacles))
                    .with_output("output", self.slot(GridRole::DensityNext))
                    .with_float("dt", dt)
                    .with_float("modulate", decay)
                    .with_int("clamp", i32::from(config.bfecc_clamp));
                self.run(KernelId::Bfecc, &combine, full)?;
            }
        }
        Ok(())
    }

    fn confine_vorticity(&mut self, dt: f32, coefficient: f32) -> Result<(), StepError> {
        let full = self.full();
        let curl = Bindings::new()
            .with_input("velocity", self.slot(GridRole::VelocityNext))
            .with_output("output", self.slot(GridRole::TempVector));
        self.run(KernelId::Curl, &curl, full)?;

        let force = Bindings::new()
            .with_input("curl", self.slot(GridRole::TempVector))
            .with_input("obstacles", self.slot(GridRole::Obstacles))
            .with_output("output", self.slot(GridRole::VelocityNext))
            .with_float("coefficient", coefficient)
            .with_float("dt", dt);
        self.run(KernelId::Confinement, &force, full)
    }

    fn apply_externals(
        &mut self,
        dt: f32,
        inputs: &FrameInputs,
        metrics: &mut StepMetrics,
    ) -> Result<(), StepError> {
        for injector in &inputs.injectors {
            let Some((params, region)) = self.place(&injector.shape, metrics) else {
                continue;
            };
            let bindings = self.force(&params, GridRole::DensityNext, injector.amount * dt);
            let kernel = capability(params.kind).external_kernel(ForcePattern::Scalar);
            self.run(kernel, &bindings, region)?;
        }

        let tpu = self.texel_per_unit();
        for motor in &inputs.motors {
            let Some((params, region)) = self.place(&motor.shape, metrics) else {
                continue;
            };
            let bindings = self.force(&params, GridRole::VelocityNext, motor.value * dt * tpu);
            let kernel = capability(params.kind).external_kernel(motor.kind.into());
            self.run(kernel, &bindings, region)?;
        }
        Ok(())
    }

    /// Returns the number of Jacobi passes run.
    fn project(&mut self, iterations: u32) -> Result<u32, StepError> {
        let full = self.full();
        let divergence = Bindings::new()
            .with_input("velocity", self.slot(GridRole::VelocityNext))
            .with_input("obstacles", self.slot(GridRole::Obstacles))
            .with_input("obstacle_velocity", self.slot(GridRole::ObstacleVelocity))
            .with_output("output", self.slot(GridRole::TempVector));
        self.run(KernelId::Divergence, &divergence, full)?;

        self.clear(GridRole::Pressure, full)?;
        for _ in 0..iterations {
            let relax = Bindings::new()
                .with_input("input0", self.slot(GridRole::TempVector))
                .with_input("input1", self.slot(GridRole::Pressure))
                .with_input("obstacles", self.slot(GridRole::Obstacles))
                .with_output("output", self.slot(GridRole::TempScalar))
                .with_float("alpha", -1.0)
                .with_float("rbeta", 1.0 / 6.0);
            self.run(KernelId::Jacobi, &relax, full)?;
            self.grids.swap(GridRole::Pressure, GridRole::TempScalar)?;
        }
        if iterations == 0 {
            self.grids.swap(GridRole::Velocity, GridRole::VelocityNext)?;
            return Ok(0);
        }

        let subtract = Bindings::new()
            .with_input("velocity", self.slot(GridRole::VelocityNext))
            .with_input("pressure", self.slot(GridRole::Pressure))
            .with_input("obstacles", self.slot(GridRole::Obstacles))
            .with_input("obstacle_velocity", self.slot(GridRole::ObstacleVelocity))
            .with_output("output", self.slot(GridRole::Velocity));
        self.run(KernelId::Project, &subtract, full)?;
        Ok(iterations)
    }

    fn run_attachments(
        &mut self,
        dt: f32,
        config: &SolverConfig,
        metrics: &mut StepMetrics,
    ) -> Result<(), StepError> {
        let attachments = &config.attachments;
        if attachments.gradient {
            self.density_gradient(dt, attachments.gradient_smoothing_iterations)?;
        }
        if attachments.distance_field {
            metrics.jfa_passes = self.flood_distance_field(attachments.distance_threshold)?;
        }
        Ok(())
    }

    /// Gradient of density into the temp vector grid, then `iterations`
    /// diffusion passes ping-ponged with the velocity scratch.
    fn density_gradient(&mut self, dt: f32, iterations: u32) -> Result<(), StepError> {
        let full = self.full();
        let gradient = Bindings::new()
            .with_input("source", self.slot(GridRole::Density))
            .with_output("output", self.slot(GridRole::TempVector));
        self.run(KernelId::Gradient, &gradient, full)?;

        let alpha = 1.0 / dt;
        for _ in 0..iterations {
            let smooth = Bindings::new()
                .with_input("input0", self.slot(GridRole::TempVector))
                .with_input("input1", self.slot(GridRole::TempVector))
                .with_input("obstacles", self.slot(GridRole::Obstacles))
                .with_output("output", self.slot(GridRole::VelocityNext))
                .with_float("alpha", alpha)
                .with_float("rbeta", 1.0 / (alpha + 6.0));
            self.run(KernelId::Jacobi, &smooth, full)?;
            self.grids.swap(GridRole::TempVector, GridRole::VelocityNext)?;
        }
        self.clear(GridRole::VelocityNext, full)
    }

    /// Nearest-seed field by jump flooding. Returns the number of passes.
    fn flood_distance_field(&mut self, threshold: f32) -> Result<u32, StepError> {
        let full = self.full();
        let seed = Bindings::new()
            .with_input("source", self.slot(GridRole::Density))
            .with_output("output", self.slot(GridRole::DistanceField))
            .with_float("threshold", threshold);
        self.run(KernelId::JfaInit, &seed, full)?;

        let passes = self.descriptor.max_resolution().next_power_of_two().trailing_zeros();
        for pass in (0..passes).rev() {
            let flood = Bindings::new()
                .with_input("input", self.slot(GridRole::DistanceField))
                .with_output("output", self.slot(GridRole::VelocityNext))
                .with_int("step", 1i32 << pass);
            self.run(KernelId::Jfa, &flood, full)?;
            self.grids.swap(GridRole::DistanceField, GridRole::VelocityNext)?;
        }
        self.clear(GridRole::VelocityNext, full)?;
        Ok(passes)
    }

    // ── Dispatch helpers ──────────────────────────────────────────

    fn run(&mut self, kernel: KernelId, bindings: &Bindings, region: VoxelBox) -> Result<(), StepError> {
        self.dispatcher
            .dispatch(&mut self.grids, kernel, bindings, region)?;
        Ok(())
    }

    fn clear(&mut self, role: GridRole, region: VoxelBox) -> Result<(), StepError> {
        let bindings = Bindings::new()
            .with_output("output", self.slot(role))
            .with_float("value", 0.0);
        self.run(KernelId::Clear, &bindings, region)
    }

    /// Semi-Lagrangian trace of `source` into `output` along current velocity.
    fn trace(&self, source: GridRole, output: GridRole, dt: f32, modulate: f32) -> Bindings {
        Bindings::new()
            .with_input("velocity", self.slot(GridRole::Velocity))
            .with_input("source", self.slot(source))
            .with_input("obstacles", self.slot(GridRole::Obstacles))
            .with_output("output", self.slot(output))
            .with_float("dt", dt)
            .with_float("modulate", modulate)
    }

    fn force(&self, params: &ShapeParameters, output: GridRole, amount: f32) -> Bindings {
        bind_shape(
            params,
            Bindings::new()
                .with_input("obstacles", self.slot(GridRole::Obstacles))
                .with_output("output", self.slot(output))
                .with_float("amount", amount)
                .with_float("falloff", FORCE_FALLOFF),
        )
    }

    /// Voxel parameters and dispatch box, or `None` (counted) when the
    /// shape covers no whole voxel of the grid.
    fn place(&self, shape: &Shape, metrics: &mut StepMetrics) -> Option<(ShapeParameters, VoxelBox)> {
        match self.evaluator.dispatch_box_for(shape) {
            Some(region) => Some((self.evaluator.parameters_for(shape), region)),
            None => {
                metrics.skipped_shapes += 1;
                log::debug!("skipping {} shape outside the grid", shape.kind());
                None
            }
        }
    }

    fn slot(&self, role: GridRole) -> plume_core::SlotIndex {
        self.grids.slot(role)
    }

    fn full(&self) -> VoxelBox {
        VoxelBox::full(self.resolution())
    }

    fn texel_per_unit(&self) -> f32 {
        self.descriptor.texel_per_unit() as f32
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl<B> Simulator<B> {
    /// Free every grid. Later updates and grid accessors fail with
    /// [`StepError::UseAfterRelease`], and so does a second release.
    pub fn release(&mut self) -> Result<(), StepError> {
        self.grids.release()?;
        log::debug!("released grids after tick {}", self.current_tick);
        Ok(())
    }

    /// Whether [`release()`](Self::release) has been called.
    pub fn is_released(&self) -> bool {
        self.grids.is_released()
    }

    /// Grid currently playing `role`.
    ///
    /// Role handles move on every update; fetch again after each tick.
    pub fn grid(&self, role: GridRole) -> Result<&Grid, StepError> {
        Ok(self.grids.grid(role)?)
    }

    /// Mutable grid currently playing `role`, for seeding state.
    pub fn grid_mut(&mut self, role: GridRole) -> Result<&mut Grid, StepError> {
        Ok(self.grids.grid_mut(role)?)
    }

    /// Current density (scalar).
    pub fn density(&self) -> Result<&Grid, StepError> {
        self.grid(GridRole::Density)
    }

    /// Current velocity in voxels per second.
    pub fn velocity(&self) -> Result<&Grid, StepError> {
        self.grid(GridRole::Velocity)
    }

    /// Pressure from the last projection.
    pub fn pressure(&self) -> Result<&Grid, StepError> {
        self.grid(GridRole::Pressure)
    }

    /// Obstacle mask: `1` for walls and collider voxels.
    pub fn obstacles(&self) -> Result<&Grid, StepError> {
        self.grid(GridRole::Obstacles)
    }

    /// Collider velocity inside solid voxels, in voxels per second.
    pub fn obstacle_velocity(&self) -> Result<&Grid, StepError> {
        self.grid(GridRole::ObstacleVelocity)
    }

    /// Smoothed density gradient. Holds scratch data unless the gradient
    /// attachment ran this tick.
    pub fn gradient(&self) -> Result<&Grid, StepError> {
        self.grid(GridRole::TempVector)
    }

    /// Nearest-seed coordinate per voxel, or
    /// [`NO_SEED`](plume_kernels::NO_SEED) where no seed exists.
    pub fn distance_field(&self) -> Result<&Grid, StepError> {
        self.grid(GridRole::DistanceField)
    }

    /// The grid sizing.
    pub fn descriptor(&self) -> &SpatialDescriptor {
        &self.descriptor
    }

    /// Shape mapping for this grid.
    pub fn evaluator(&self) -> &ShapeEvaluator {
        &self.evaluator
    }

    /// Grid resolution in voxels.
    pub fn resolution(&self) -> UVec3 {
        self.descriptor.resolution()
    }

    /// The underlying grid set.
    pub fn buffers(&self) -> &GridBufferSet {
        &self.grids
    }

    /// Metrics from the most recent successful update.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Number of completed updates.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Bytes held by the grids. Zero after release.
    pub fn memory_bytes(&self) -> usize {
        self.grids.memory_bytes()
    }

    /// Dispatcher with per-kernel counters.
    pub fn dispatcher(&self) -> &KernelDispatcher<B> {
        &self.dispatcher
    }

    /// Mutable dispatcher, for backend access.
    pub fn dispatcher_mut(&mut self) -> &mut KernelDispatcher<B> {
        &mut self.dispatcher
    }
}
