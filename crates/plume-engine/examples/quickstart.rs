//! Plume quickstart: a smoke plume rising past a moving obstacle.
//!
//! Demonstrates:
//!   1. Building a `FieldConfig` and a `FluidField` on the CPU backend
//!   2. Registering an injector, a motor and a collider
//!   3. Moving the collider through deferred actions
//!   4. Reading density and per-stage timings after each tick
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example quickstart

use glam::{Quat, Vec3};
use plume_core::MotorKind;
use plume_engine::{Collider, FieldConfig, FluidField, Injector, Motor, SolverConfig};
use plume_kernels::CpuBackend;
use plume_space::Shape;

const DT: f32 = 1.0 / 30.0;
const TICKS: u32 = 60;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Plume Quickstart ===\n");

    let config = FieldConfig {
        texel_per_unit: 24,
        size: Vec3::new(1.0, 2.0, 1.0),
        solver: SolverConfig {
            jacobi_iterations: 30,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut field = FluidField::new(config, CpuBackend::new())?;
    println!("{}\n", field.memory_report());

    let source = Vec3::new(0.5, 0.2, 0.5);
    let scene = field.registry_mut();
    scene.add_injector(Injector::new(Shape::sphere(source, 0.12), 4.0));
    // Local +Z points up after a quarter turn about X.
    let up = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
    scene.add_motor(Motor::new(
        Shape::cuboid(source, Vec3::splat(0.3), up),
        MotorKind::Direction,
        2.0,
    ));
    let ball = scene.add_collider(Collider::new(Shape::sphere(Vec3::new(0.3, 1.0, 0.5), 0.15)));

    for tick in 1..=TICKS {
        field.step(DT)?;

        // Sweep the ball across the column.
        let x = 0.3 + 0.4 * (tick as f32 / TICKS as f32);
        field.execute_in_next_update(move |scene| {
            scene.set_collider_shape(ball, Shape::sphere(Vec3::new(x, 1.0, 0.5), 0.15));
        });

        if tick % 10 == 0 {
            let sim = field.simulator();
            let metrics = sim.last_metrics();
            println!(
                "tick {:>3}: density {:>10.3}  {:>5}us  {} dispatches",
                sim.current_tick(),
                sim.density()?.sum(),
                metrics.total_us,
                metrics.dispatches
            );
            for (stage, us) in &metrics.stage_us {
                println!("    {stage:<12} {us:>6}us");
            }
        }
    }

    field.release()?;
    println!("\nReleased: {}", field.simulator().is_released());
    Ok(())
}
