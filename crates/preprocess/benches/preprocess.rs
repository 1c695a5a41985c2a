use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use preprocess::{IMAGENET_MEAN, IMAGENET_STD, Normalizer, SourceImage};

/// Gradient test photo
fn create_test_image(width: u32, height: u32) -> SourceImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    SourceImage::new(DynamicImage::ImageRgb8(img))
}

fn benchmark_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    // Typical phone camera and library resolutions
    let resolutions = [(640, 480), (1920, 1080), (3024, 4032)];
    let normalizer = Normalizer::default();

    for (width, height) in resolutions.iter() {
        let source = create_test_image(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("stretch_argb", format!("{}x{}", width, height)),
            &source,
            |b, source| b.iter(|| normalizer.normalize(black_box(source)).unwrap()),
        );
    }

    group.finish();
}

fn benchmark_tensor(c: &mut Criterion) {
    let buffer = Normalizer::default()
        .normalize(&create_test_image(640, 480))
        .unwrap();

    c.bench_function("to_nchw_tensor_224", |b| {
        b.iter(|| {
            black_box(&buffer)
                .to_nchw_tensor(IMAGENET_MEAN, IMAGENET_STD)
                .unwrap()
        })
    });
}

criterion_group!(benches, benchmark_normalize, benchmark_tensor);
criterion_main!(benches);
