//! Per-stage timing profile of the reference scene.
//!
//! Runs the 64³ scene for a fixed number of ticks under both advection
//! policies and prints average microseconds per pipeline stage.

use std::collections::BTreeMap;

use plume_bench::{reference_config, reference_field, BENCH_DT};
use plume_engine::AdvectionPolicy;

const TICKS: u32 = 30;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Plume Stage Profile ===\n");

    for policy in [AdvectionPolicy::Back, AdvectionPolicy::Bfecc] {
        let mut field = reference_field(reference_config(policy))?;
        let mut totals: BTreeMap<&'static str, u64> = BTreeMap::new();
        let mut total_us = 0u64;

        for _ in 0..TICKS {
            field.step(BENCH_DT)?;
            let metrics = field.simulator().last_metrics();
            total_us += metrics.total_us;
            for (stage, us) in &metrics.stage_us {
                *totals.entry(stage).or_default() += us;
            }
        }

        let metrics = field.simulator().last_metrics();
        println!(
            "{policy:?}: {} us/tick, {} dispatches/tick",
            total_us / u64::from(TICKS),
            metrics.dispatches
        );
        for (stage, us) in totals {
            println!("    {stage:<12} {:>8} us", us / u64::from(TICKS));
        }
        println!();
    }
    Ok(())
}
