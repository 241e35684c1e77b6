use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use brook::Brook;

// --- Helpers ---

fn int_chain(len: u64) -> Brook<u64> {
  Brook::of(0..len)
}

// --- Benchmarks ---

fn bench_map_filter_collect(c: &mut Criterion) {
  let mut group = c.benchmark_group("map_filter_collect");
  for size in [100u64, 1_000, 10_000] {
    group.throughput(Throughput::Elements(size));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
      let chain = int_chain(size).map(|n| n * 3).filter(|n| n % 2 == 0);
      b.iter(|| chain.collect().unwrap());
    });
  }
  group.finish();
}

fn bench_flat_map(c: &mut Criterion) {
  let mut group = c.benchmark_group("flat_map_collect");
  for size in [100u64, 1_000] {
    group.throughput(Throughput::Elements(size * 4));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
      let chain = int_chain(size).flat_map(|n| vec![n, n + 1, n + 2, n + 3]);
      b.iter(|| chain.collect().unwrap());
    });
  }
  group.finish();
}

fn bench_distinct_sorted(c: &mut Criterion) {
  let mut group = c.benchmark_group("distinct_sorted");
  for size in [100u64, 1_000] {
    group.throughput(Throughput::Elements(size));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
      let chain = int_chain(size).map(|n| n % 64).distinct().sorted();
      b.iter(|| chain.collect().unwrap());
    });
  }
  group.finish();
}

fn bench_generator_limit(c: &mut Criterion) {
  let mut group = c.benchmark_group("generator_limit");
  for size in [100usize, 1_000] {
    group.throughput(Throughput::Elements(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
      // A fresh generator per iteration: generator state is shared across
      // subscriptions, which would otherwise skew the run.
      b.iter(|| Brook::naturals().limit(size).collect().unwrap());
    });
  }
  group.finish();
}

criterion_group!(
  benches,
  bench_map_filter_collect,
  bench_flat_map,
  bench_distinct_sorted,
  bench_generator_limit
);
criterion_main!(benches);
