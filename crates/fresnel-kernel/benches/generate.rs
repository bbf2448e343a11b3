//! Benchmarks for lens mesh generation.
//!
//! Run with: cargo bench -p fresnel-kernel

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fresnel_kernel::{generate, generate_serial, EffectiveRadius, LensParams, LensSpec};

fn lens(n_prisms: u32) -> LensSpec {
    LensParams::square(100.0, 200.0)
        .with_prisms(n_prisms)
        .with_facets(3)
        .with_radius_mode(EffectiveRadius::Radial)
        .validate()
        .expect("benchmark lens is valid")
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for n in [10u32, 50, 200] {
        let spec = lens(n);
        group.throughput(Throughput::Elements(spec.surface_triangle_count() as u64));
        group.bench_with_input(BenchmarkId::new("parallel", n), &spec, |b, spec| {
            b.iter(|| generate(black_box(spec)))
        });
        group.bench_with_input(BenchmarkId::new("serial", n), &spec, |b, spec| {
            b.iter(|| generate_serial(black_box(spec)))
        });
    }
    group.finish();
}

fn bench_to_indexed(c: &mut Criterion) {
    let mesh = generate(&lens(50)).expect("benchmark lens generates");
    c.bench_function("to_indexed/50", |b| b.iter(|| black_box(&mesh).to_indexed()));
}

criterion_group!(benches, bench_generate, bench_to_indexed);
criterion_main!(benches);
