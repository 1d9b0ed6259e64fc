//! # Calibration Lookup Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use act_lib::calib::{CalibSample, CalibTable, ResolutionMode};

fn lookup_benchmark(c: &mut Criterion) {
    // ---- Build a dense table ----

    let samples = (0..10_000)
        .map(|i| {
            let current = i as f64 * 1e-3;
            CalibSample {
                current,
                position: 25.0 * (1.0 - (-current / 0.9).exp()),
            }
        })
        .collect();

    let table = CalibTable::from_samples(samples).unwrap();

    // ---- Benchmark both modes ----

    c.bench_function("nearest lookup", |b| {
        b.iter(|| table.resolve(black_box(4.3217), ResolutionMode::Nearest))
    });

    c.bench_function("interpolated lookup", |b| {
        b.iter(|| table.resolve(black_box(4.3217), ResolutionMode::Interpolated))
    });
}

criterion_group!(benches, lookup_benchmark);
criterion_main!(benches);
