//! Descriptor/view conversion benchmarks.
//!
//! The adapter promises copy-free, allocation-free conversion; these
//! benches keep that honest by measuring the round trip against plain
//! slice access.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use filtermod_abi::{ByteView, HeaderView, RawBytes};

fn bench_byte_view_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("byte_view_round_trip");
    for size in [0usize, 64, 4096, 65536] {
        let bytes = vec![0xA5u8; size];
        group.bench_function(format!("{size}b"), |b| {
            b.iter(|| {
                let raw = RawBytes::from_slice(black_box(&bytes));
                // SAFETY: raw describes `bytes`, alive for the iteration.
                let view = unsafe { ByteView::from_raw(raw) };
                let back = view.as_raw();
                black_box((view.as_slice().len(), back.ptr, back.len))
            });
        });
    }
    group.finish();
}

fn bench_header_view_round_trip(c: &mut Criterion) {
    let key = b"x-request-id";
    let value = b"00000000-0000-4000-8000-000000000000";
    c.bench_function("header_view_round_trip", |b| {
        b.iter(|| {
            let header = HeaderView::new(black_box(key), black_box(value));
            let raw = header.as_raw();
            // SAFETY: raw describes key/value, alive for the iteration.
            let again = unsafe { HeaderView::from_raw(raw) };
            black_box((again.key().len(), again.value().len()))
        });
    });
}

fn bench_slice_baseline(c: &mut Criterion) {
    let bytes = vec![0xA5u8; 4096];
    c.bench_function("slice_baseline_4096b", |b| {
        b.iter(|| black_box(black_box(&bytes).len()));
    });
}

criterion_group!(
    benches,
    bench_byte_view_round_trip,
    bench_header_view_round_trip,
    bench_slice_baseline
);
criterion_main!(benches);
