//! # GCS Filter Benchmarks
//!
//! Performance targets:
//! - Build: O(N log N) for hashing, sorting and Rice coding
//! - Single query: O(N) decode with early exit
//! - Batch query: O(N + K log K) single merge pass
//! - Wire decode: O(1) besides copying the body
//!
//! ## Usage
//!
//! ```bash
//! cargo bench --package gcs-filter --bench gcs_benchmarks
//! cargo bench --package gcs-filter --bench gcs_benchmarks -- gcs/match_any
//! ```

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gcs_filter::{GcsFilter, GOLOMB_P};
use rand::Rng;

const KEY: [u8; 16] = [0x42; 16];

/// Script-sized random items
fn generate_items(count: usize) -> Vec<Vec<u8>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let mut item = vec![0u8; 25];
            rng.fill(&mut item[..]);
            item
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcs/build");
    group.measurement_time(Duration::from_secs(10));

    for size in [100usize, 1_000, 10_000] {
        let items = generate_items(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("basic_p19", size), &items, |b, items| {
            b.iter(|| black_box(GcsFilter::build(GOLOMB_P, &KEY, black_box(items))))
        });
    }

    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcs/contains");

    for size in [100usize, 1_000, 10_000] {
        let items = generate_items(size);
        let Ok(filter) = GcsFilter::build(GOLOMB_P, &KEY, &items) else {
            continue;
        };
        let absent = generate_items(1).remove(0);

        group.bench_with_input(BenchmarkId::new("member", size), &filter, |b, filter| {
            let target = &items[size / 2];
            b.iter(|| black_box(filter.contains(&KEY, black_box(target))))
        });
        group.bench_with_input(BenchmarkId::new("absent", size), &filter, |b, filter| {
            b.iter(|| black_box(filter.contains(&KEY, black_box(&absent))))
        });
    }

    group.finish();
}

fn bench_match_any(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcs/match_any");
    group.measurement_time(Duration::from_secs(10));

    let items = generate_items(10_000);
    let Ok(filter) = GcsFilter::build(GOLOMB_P, &KEY, &items) else {
        return;
    };

    // Wallet-sized watch lists, all absent so the full stream is walked
    for targets in [1usize, 10, 100, 1_000] {
        let watch_list = generate_items(targets);
        group.throughput(Throughput::Elements(targets as u64));
        group.bench_with_input(
            BenchmarkId::new("absent_targets", targets),
            &watch_list,
            |b, watch_list| b.iter(|| black_box(filter.match_any(&KEY, black_box(watch_list)))),
        );
    }

    group.finish();
}

fn bench_wire(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcs/wire");

    let items = generate_items(10_000);
    let Ok(filter) = GcsFilter::build(GOLOMB_P, &KEY, &items) else {
        return;
    };
    let Ok(bytes) = filter.to_basic_bytes() else {
        return;
    };

    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("decode_basic", |b| {
        b.iter(|| black_box(GcsFilter::from_basic_bytes(black_box(&bytes))))
    });
    group.bench_function("filter_hash", |b| b.iter(|| black_box(filter.hash())));

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_contains,
    bench_match_any,
    bench_wire
);
criterion_main!(benches);
