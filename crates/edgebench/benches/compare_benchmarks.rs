//! Benchmarks for the comparator and the two edge pipelines.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use edgebench::pipeline::{candidate_magnitude, reference_magnitude, synthetic_image};
use edgebench::{Grid, compare};

const SIZES: [(usize, usize); 3] = [(64, 64), (256, 256), (1024, 1024)];

fn benchmark_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("edgebench/compare");
    for (rows, cols) in SIZES {
        let reference = synthetic_image(rows, cols, 25);
        let candidate = Grid::from_fn(rows, cols, |r, col| {
            reference.get(r, col).unwrap_or(0.0) + 1e-4
        });
        group.throughput(Throughput::Elements((rows * cols) as u64));
        group.bench_with_input(
            BenchmarkId::new("compare", format!("{rows}x{cols}")),
            &(reference, candidate),
            |b, (reference, candidate)| {
                b.iter(|| black_box(compare(reference, candidate, 1e-3)));
            },
        );
    }
    group.finish();
}

fn benchmark_magnitude(c: &mut Criterion) {
    let mut group = c.benchmark_group("edgebench/magnitude");
    for (rows, cols) in SIZES {
        let image = synthetic_image(rows, cols, 25);
        let size = format!("{rows}x{cols}");
        group.throughput(Throughput::Elements((rows * cols) as u64));
        group.bench_with_input(BenchmarkId::new("reference", &size), &image, |b, image| {
            b.iter(|| black_box(reference_magnitude(image)));
        });
        group.bench_with_input(BenchmarkId::new("candidate", &size), &image, |b, image| {
            b.iter(|| black_box(candidate_magnitude(image)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_compare, benchmark_magnitude);
criterion_main!(benches);
