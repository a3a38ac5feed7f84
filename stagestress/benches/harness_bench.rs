//! Benchmarks for scheduling overhead and report computation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stagestress::prelude::*;

fn noop_harness(stages: usize) -> Harness {
    let mut harness = Harness::new();
    for stage in 0..stages {
        harness
            .register_stage(format!("stage-{stage}"), FixedOutcome(1))
            .expect("fresh harness accepts stages");
    }
    harness
}

fn scheduler_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule_noop_runs");
    for concurrency in [1_usize, 4, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(concurrency),
            &concurrency,
            |b, &concurrency| {
                b.iter(|| {
                    let mut harness = noop_harness(3);
                    black_box(harness.run(concurrency, 1_000).expect("run succeeds"))
                });
            },
        );
    }
    group.finish();
}

fn report_benchmark(c: &mut Criterion) {
    let mut harness = noop_harness(4);
    harness.run(8, 10_000).expect("run succeeds");
    let filter = FilterMask::accept_all(4);

    c.bench_function("statistics_10k_runs", |b| {
        b.iter(|| black_box(harness.statistics(filter.clone(), true).expect("non-empty")));
    });
}

criterion_group!(benches, scheduler_benchmark, report_benchmark);
criterion_main!(benches);
