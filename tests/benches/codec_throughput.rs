//! Morse codec throughput
//!
//! Run with:
//!   cargo bench -p morse-tests --bench codec_throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use morse_core::{decode, encode, INPUT_CAPACITY, PAYLOAD_CAPACITY};

/// Pangram repeated up to `len` characters
fn sample_text(len: usize) -> String {
    "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for len in [10, 50, INPUT_CAPACITY] {
        let text = sample_text(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| encode::<1024>(black_box(text)));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for len in [10, 50, INPUT_CAPACITY] {
        let stream = encode::<PAYLOAD_CAPACITY>(&sample_text(len));
        group.throughput(Throughput::Bytes(stream.stream.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &stream, |b, stream| {
            b.iter(|| decode::<PAYLOAD_CAPACITY>(black_box(stream.as_bytes())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
