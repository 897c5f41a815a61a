//! Load-order resolution performance benchmarks
//!
//! Benchmarks the dependency walk over chains, wide fan-outs, cyclic
//! graphs and graphs with unsatisfied packages, plus name merging.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grove_benchmarks::{chain, criterion_config, fan_out, layered, rings};
use grove_resolver::{resolve, PackageSet};

/// Benchmark resolution of a single long chain
fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");
    group.sample_size(20);

    for size in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        let packages = chain(*size);

        group.bench_with_input(BenchmarkId::new("packages", size), &packages, |b, packages| {
            b.iter(|| black_box(resolve(packages.clone())));
        });
    }

    group.finish();
}

/// Benchmark one package depending on everything else
fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");

    for size in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        let packages = fan_out(*size);

        group.bench_with_input(BenchmarkId::new("packages", size), &packages, |b, packages| {
            b.iter(|| black_box(resolve(packages.clone())));
        });
    }

    group.finish();
}

/// Benchmark cycle reporting
fn bench_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycles");

    for ring in [2, 10, 100].iter() {
        let packages = rings(1_000, *ring);

        group.bench_with_input(BenchmarkId::new("ring_size", ring), &packages, |b, packages| {
            b.iter(|| black_box(resolve(packages.clone())));
        });
    }

    group.finish();
}

/// Benchmark unsatisfied propagation through dense layers
fn bench_unsatisfied(c: &mut Criterion) {
    let mut group = c.benchmark_group("unsatisfied");
    group.sample_size(20);

    for layers in [5, 20, 50].iter() {
        group.throughput(Throughput::Elements((*layers * 20) as u64));
        let packages = layered(*layers, 20);

        group.bench_with_input(BenchmarkId::new("layers", layers), &packages, |b, packages| {
            b.iter(|| black_box(resolve(packages.clone())));
        });
    }

    group.finish();
}

/// Benchmark merging precedence levels that override each other
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for levels in [1, 4, 16].iter() {
        let level = chain(1_000);

        group.bench_with_input(BenchmarkId::new("levels", levels), levels, |b, &levels| {
            b.iter(|| {
                let mut set = PackageSet::new();
                for _ in 0..levels {
                    set.add_packages(level.clone());
                }
                black_box(set.resolve())
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_chain, bench_fan_out, bench_cycles, bench_unsatisfied, bench_merge
}
criterion_main!(benches);
