use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reverse_isp_rs::image_pipeline::matrix::Matrix;
use reverse_isp_rs::image_pipeline::{
    CameraModel, Domain, GamutMap, Materialization, PipelineConfig, PixelBuffer, RbfKernel,
    ReversePipeline, ReverseTone, StandardTiffWriter, TiffImageReader,
};
use std::hint::black_box;

/// Synthetic model with `n` control points on a diagonal through the cube.
fn synthetic_model(n: usize) -> CameraModel {
    let ctrl: Vec<Vec<f32>> = (0..n)
        .map(|k| {
            let t = k as f32 / n as f32;
            vec![t, (t * 1.7) % 1.0, (t * 2.3) % 1.0]
        })
        .collect();
    let weights: Vec<Vec<f32>> = (0..n)
        .map(|k| {
            let w = 0.001 * ((k % 7) as f32 - 3.0);
            vec![w, -w, w * 0.5]
        })
        .collect();
    let coefs = Matrix::from_rows(vec![
        vec![0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ])
    .unwrap();
    let gamut = GamutMap::new(
        Matrix::from_rows(ctrl).unwrap(),
        Matrix::from_rows(weights).unwrap(),
        coefs,
        RbfKernel::Linear,
    )
    .unwrap();

    CameraModel::new(
        Matrix::from_array3([[1.2, -0.1, -0.1], [-0.2, 1.3, -0.1], [0.0, -0.3, 1.3]]),
        Matrix::from_array3([[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.6]]),
        None,
        gamut.clone(),
        gamut,
        ReverseTone::identity(),
        0,
    )
    .unwrap()
}

fn generate_image(width: usize, height: usize) -> PixelBuffer<u8> {
    PixelBuffer::from_fn(Domain::rgb(width, height), |x, y, c| {
        ((x * 3 + y * 5 + c * 71) % 256) as u8
    })
}

fn benchmark_materialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialization");
    let image = generate_image(32, 32);
    let model = synthetic_model(256);

    let policies = vec![
        (Materialization::Default, "default"),
        (Materialization::Inline, "inline"),
        (Materialization::Eager, "eager"),
    ];

    for (materialization, label) in policies {
        let config = PipelineConfig::builder()
            .materialization(materialization)
            .build();
        let pipeline =
            ReversePipeline::with_custom(TiffImageReader, StandardTiffWriter, model.clone(), config);

        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            b.iter(|| pipeline.convert_image(black_box(image), 0));
        });
    }

    group.finish();
}

fn benchmark_control_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("control_points");
    let image = generate_image(32, 32);
    group.throughput(Throughput::Elements((image.width() * image.height()) as u64));

    for n in [64, 512, 3702] {
        let pipeline = ReversePipeline::with_custom(
            TiffImageReader,
            StandardTiffWriter,
            synthetic_model(n),
            PipelineConfig::default(),
        );

        group.bench_with_input(BenchmarkId::from_parameter(n), &image, |b, image| {
            b.iter(|| pipeline.convert_image(black_box(image), 0));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_materialization, benchmark_control_points);
criterion_main!(benches);
