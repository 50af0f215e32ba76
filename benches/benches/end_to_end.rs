//! End-to-end document reading benchmarks
//!
//! Run with: cargo bench

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flate2::write::ZlibEncoder;
use psd::{LayeredFile, ReadOptions};

const SIZE: u32 = 256;

fn zip_span(plane: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(plane).unwrap();
    let mut span = 2u16.to_be_bytes().to_vec();
    span.extend(encoder.finish().unwrap());
    span
}

/// 8-bit RGB document with `layers` full-size zip-compressed layers
fn document(layers: usize) -> Vec<u8> {
    let pixels = (SIZE * SIZE) as usize;
    let mut records = Vec::new();
    let mut spans = Vec::new();

    for index in 0..layers {
        let channel_spans: Vec<Vec<u8>> = (0..3u8)
            .map(|channel| {
                let plane: Vec<u8> = (0..pixels)
                    .map(|i| (i as u8).wrapping_add(channel).wrapping_mul(index as u8 + 1))
                    .collect();
                zip_span(&plane)
            })
            .collect();

        records.extend([0i32, 0, SIZE as i32, SIZE as i32].iter().flat_map(|v| v.to_be_bytes()));
        records.extend_from_slice(&3u16.to_be_bytes());
        for (id, span) in channel_spans.iter().enumerate() {
            records.extend_from_slice(&(id as i16).to_be_bytes());
            records.extend_from_slice(&(span.len() as u32).to_be_bytes());
        }
        records.extend_from_slice(b"8BIMnorm");
        records.extend_from_slice(&[255, 0, 0, 0]);
        records.extend_from_slice(&12u32.to_be_bytes());
        records.extend_from_slice(&[0; 8]);
        records.extend_from_slice(&[1, b'L', 0, 0]);
        spans.extend(channel_spans.into_iter().flatten());
    }

    let mut info = (layers as i16).to_be_bytes().to_vec();
    info.extend(records);
    info.extend(spans);

    let mut out = b"8BPS".to_vec();
    out.extend_from_slice(&1u16.to_be_bytes());
    out.extend_from_slice(&[0; 6]);
    out.extend_from_slice(&3u16.to_be_bytes());
    out.extend_from_slice(&SIZE.to_be_bytes());
    out.extend_from_slice(&SIZE.to_be_bytes());
    out.extend_from_slice(&8u16.to_be_bytes());
    out.extend_from_slice(&3u16.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&(info.len() as u32 + 8).to_be_bytes());
    out.extend_from_slice(&(info.len() as u32).to_be_bytes());
    out.extend(info);
    out.extend_from_slice(&0u32.to_be_bytes());
    out
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("Read Document");
    group.sample_size(20);

    for layers in [1usize, 8] {
        let data = document(layers);
        for parallel in [false, true] {
            let options = ReadOptions::new().parallel(parallel);
            let mode = if parallel { "parallel" } else { "sequential" };
            let id = format!("{}_layers_{}", layers, mode);
            group.bench_with_input(BenchmarkId::from_parameter(id), &data, |b, data| {
                b.iter(|| LayeredFile::<u8>::read_with_options(black_box(data), &options).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_read);
criterion_main!(benches);
