//! Benchmarks for the pixelift image preparation pipeline.
//!
//! Run with: cargo bench -p pixelift-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, RgbImage};
use pixelift_core::config::LimitsConfig;
use pixelift_core::pipeline::{DimensionProbe, Downscaler, JpegNormalizer};

fn benchmark_probe(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probe.png");
    DynamicImage::ImageRgb8(RgbImage::new(1920, 1080))
        .save(&path)
        .unwrap();

    c.bench_function("probe_dimensions", |b| {
        b.iter(|| {
            let _ = DimensionProbe::probe(black_box(&path));
        })
    });
}

fn benchmark_downscale(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    DynamicImage::ImageRgb8(RgbImage::new(1920, 1080))
        .save(&input)
        .unwrap();
    let output = dir.path().join("output.png");

    let downscaler = Downscaler::new(LimitsConfig::default(), 90);
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("downscale_1080_to_400", |b| {
        b.iter(|| {
            let _ = rt.block_on(downscaler.resize_to_height(
                black_box(&input),
                black_box(&output),
                400,
            ));
        })
    });
}

fn benchmark_normalize(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    DynamicImage::ImageRgb8(RgbImage::new(800, 400))
        .save(&input)
        .unwrap();
    let output = dir.path().join("output.jpg");

    let normalizer = JpegNormalizer::new(LimitsConfig::default(), 90);
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("normalize_to_jpeg", |b| {
        b.iter(|| {
            let _ = rt.block_on(normalizer.normalize(black_box(&input), black_box(&output)));
        })
    });
}

criterion_group!(
    benches,
    benchmark_probe,
    benchmark_downscale,
    benchmark_normalize,
);
criterion_main!(benches);
