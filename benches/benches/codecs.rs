//! Benchmarks for channel decompression
//!
//! Run with: cargo bench

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flate2::write::ZlibEncoder;
use psd_compression::{decode_rle, inflate, reverse_prediction};
use psd_core::{BitDepth, Version};

const WIDTH: usize = 512;
const HEIGHT: usize = 512;

fn plane() -> Vec<u8> {
    (0..WIDTH * HEIGHT)
        .map(|i| if (i / 37) % 2 == 0 { 200 } else { (i % 251) as u8 })
        .collect()
}

/// PackBits with literal runs only, plus the PSD row count table
fn rle_encode(plane: &[u8]) -> Vec<u8> {
    let rows: Vec<Vec<u8>> = plane
        .chunks(WIDTH)
        .map(|row| {
            let mut out = Vec::new();
            for chunk in row.chunks(128) {
                out.push((chunk.len() - 1) as u8);
                out.extend_from_slice(chunk);
            }
            out
        })
        .collect();
    let mut out: Vec<u8> = rows
        .iter()
        .flat_map(|row| (row.len() as u16).to_be_bytes())
        .collect();
    for row in rows {
        out.extend(row);
    }
    out
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn bench_rle(c: &mut Criterion) {
    let encoded = rle_encode(&plane());
    c.bench_function("rle_decode_512x512", |b| {
        b.iter(|| decode_rle(black_box(&encoded), WIDTH, HEIGHT, Version::Psd).unwrap());
    });
}

fn bench_inflate(c: &mut Criterion) {
    let data = plane();
    let compressed = deflate(&data);
    c.bench_function("inflate_512x512", |b| {
        b.iter(|| inflate(black_box(&compressed), data.len()).unwrap());
    });
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reverse Prediction");

    for depth in [BitDepth::Eight, BitDepth::Sixteen, BitDepth::ThirtyTwo] {
        let width = WIDTH / depth.bytes_per_sample();
        let data = plane();
        group.bench_with_input(BenchmarkId::from_parameter(depth.bits()), &data, |b, data| {
            b.iter(|| {
                let mut buffer = data.clone();
                reverse_prediction(black_box(&mut buffer), width, HEIGHT, depth);
                buffer
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rle, bench_inflate, bench_prediction);
criterion_main!(benches);
