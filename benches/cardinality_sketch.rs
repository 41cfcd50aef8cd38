use cardinality_sketch::HyperLogLog;
use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};

/// Insert and estimate operations are benchmarked against cardinalities ranging
/// from 0 to `DEFAULT_MAX_CARDINALITY` or environment variable `N` (if defined)
/// with cardinality doubled with every iteration as [0, 1, 2, ..., N].
const DEFAULT_MAX_CARDINALITY: usize = 1 << 16;

criterion_group!(benches, benchmark);
criterion_main!(benches);

fn benchmark(c: &mut Criterion) {
    let max_cardinality = std::env::var("N")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CARDINALITY);

    let cardinalities: Vec<usize> = std::iter::once(0)
        .chain((0..).map(|c| 1 << c))
        .take_while(|&c| c <= max_cardinality)
        .collect();

    let mut group = c.benchmark_group("insert");
    for &cardinality in &cardinalities {
        group.throughput(Throughput::Elements(cardinality.max(1) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(cardinality),
            &cardinality,
            |b, &n| {
                b.iter(|| {
                    let mut hll = HyperLogLog::<usize>::new();
                    for i in 0..n {
                        hll.insert(black_box(&i));
                    }
                    hll
                })
            },
        );
    }
    group.finish();

    let mut group = c.benchmark_group("compute_cardinality");
    group.throughput(Throughput::Elements(1));
    for &cardinality in &cardinalities {
        let mut hll = HyperLogLog::<usize>::new();
        for i in 0..cardinality {
            hll.insert(&i);
        }
        group.bench_with_input(
            BenchmarkId::from_parameter(cardinality),
            &cardinality,
            |b, _| b.iter(|| black_box(hll.compute_cardinality())),
        );
    }
    group.finish();
}
