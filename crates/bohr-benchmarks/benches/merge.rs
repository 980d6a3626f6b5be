//! Deep merge benchmarks

use bohr_benchmarks::{criterion_config, nested_mapping};
use bohr_config::deep_merge;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

/// Merge mappings of growing size into a copy of themselves, which walks
/// every nested mapping and replaces every leaf
fn bench_deep_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_merge");

    for (width, depth) in [(4usize, 2usize), (8, 3), (16, 3)] {
        let base = nested_mapping(width, depth);
        let overlay = nested_mapping(width, depth);
        let leaves = width.pow(depth as u32 + 1);
        group.throughput(Throughput::Elements(leaves as u64));

        group.bench_with_input(
            BenchmarkId::new("overlapping", format!("{}x{}", width, depth)),
            &(base, overlay),
            |b, (base, overlay)| {
                b.iter_batched(
                    || (base.clone(), overlay.clone()),
                    |(mut target, source)| {
                        deep_merge(&mut target, source);
                        black_box(target)
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

/// Merge many single-key trees into one accumulator, the shape produced by
/// environment and command-line sources
fn bench_incremental_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_merge");

    for count in [10usize, 100, 1000] {
        let trees: Vec<_> = (0..count)
            .map(|i| {
                bohr_config::build_tree(
                    &format!("section{}.group{}.key{}", i % 10, i % 7, i),
                    Some("1"),
                    bohr_config::CoercionMode::Prefix,
                )
            })
            .collect();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("trees", count), &trees, |b, trees| {
            b.iter_batched(
                || trees.clone(),
                |trees| {
                    let mut accumulator = bohr_core::Mapping::new();
                    for tree in trees {
                        deep_merge(&mut accumulator, tree);
                    }
                    black_box(accumulator)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_deep_merge, bench_incremental_merge
}
criterion_main!(benches);
