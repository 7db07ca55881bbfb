//! Criterion benchmarks for full solver ticks.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use plume_bench::{reference_config, reference_field, small_config, BENCH_DT};
use plume_engine::AdvectionPolicy;

fn bench_tick_32(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_32");
    for policy in [AdvectionPolicy::Back, AdvectionPolicy::Bfecc] {
        let mut field = reference_field(small_config(policy)).unwrap();
        // Warm up: first tick settles collider history.
        field.step(BENCH_DT).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(format!("{policy:?}")), &policy, |b, _| {
            b.iter(|| {
                field.step(BENCH_DT).unwrap();
                black_box(field.simulator().last_metrics().dispatches);
            });
        });
    }
    group.finish();
}

fn bench_tick_64(c: &mut Criterion) {
    let mut field = reference_field(reference_config(AdvectionPolicy::Bfecc)).unwrap();
    field.step(BENCH_DT).unwrap();

    let mut group = c.benchmark_group("tick_64");
    group.sample_size(20);
    group.bench_function("bfecc", |b| {
        b.iter(|| {
            field.step(BENCH_DT).unwrap();
            black_box(field.simulator().last_metrics().dispatches);
        });
    });
    group.finish();
}

fn bench_tick_32_attachments(c: &mut Criterion) {
    let mut config = small_config(AdvectionPolicy::Bfecc);
    config.solver.attachments.gradient = true;
    config.solver.attachments.distance_field = true;
    let mut field = reference_field(config).unwrap();
    field.step(BENCH_DT).unwrap();

    c.bench_function("tick_32_attachments", |b| {
        b.iter(|| {
            field.step(BENCH_DT).unwrap();
            black_box(field.simulator().last_metrics().jfa_passes);
        });
    });
}

fn bench_jacobi_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobi_iterations_32");
    for iterations in [5u32, 20, 60] {
        let mut config = small_config(AdvectionPolicy::Back);
        config.solver.jacobi_iterations = iterations;
        let mut field = reference_field(config).unwrap();
        field.step(BENCH_DT).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(iterations), &iterations, |b, _| {
            b.iter(|| {
                field.step(BENCH_DT).unwrap();
                black_box(field.simulator().last_metrics().jacobi_passes);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_tick_32,
    bench_tick_64,
    bench_tick_32_attachments,
    bench_jacobi_sweep
);
criterion_main!(benches);
