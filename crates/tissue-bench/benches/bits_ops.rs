//! Criterion micro-benchmarks for bit spans and store addressing.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use tissue_arena::TissueState;
use tissue_bench::reference_profile;
use tissue_core::{BitBuffer, TissueCoordinates};

/// Benchmark: write then read 10K unaligned 13-bit values.
fn bench_span_round_trip(c: &mut Criterion) {
    let buffer = BitBuffer::zeroed(13 * 10_000).unwrap();

    c.bench_function("span_round_trip_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for i in 0..10_000u64 {
                let span = buffer.span(i * 13, 13);
                span.set_value(i & 0x1FFF);
                sum += span.value();
            }
            black_box(sum);
        });
    });
}

/// Benchmark: resolve every cell span of the reference store.
fn bench_cell_addressing(c: &mut Criterion) {
    let store = TissueState::new(Arc::new(reference_profile())).unwrap();
    let extents = store.shape().extents();

    c.bench_function("cell_addressing_reference", |b| {
        b.iter(|| {
            for cc in 0..extents.columnar {
                for y in 0..extents.y {
                    for x in 0..extents.x {
                        let span = store.cell(TissueCoordinates::new(x, y, cc));
                        black_box(span.num_bits());
                    }
                }
            }
        });
    });
}

/// Benchmark: full snapshot of the reference store.
fn bench_snapshot(c: &mut Criterion) {
    let store = TissueState::new(Arc::new(reference_profile())).unwrap();

    c.bench_function("snapshot_reference", |b| {
        b.iter(|| black_box(store.snapshot()));
    });
}

criterion_group!(benches, bench_span_round_trip, bench_cell_addressing, bench_snapshot);
criterion_main!(benches);
