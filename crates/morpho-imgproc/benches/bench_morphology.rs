use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use morpho_image::{Image, ImageSize};
use morpho_imgproc::morphology::{
    dilate_with_options, erode_with_options, morphology_ex, Kernel, KernelShape, MorphOp,
    MorphOptions,
};
use morpho_imgproc::parallel::ExecutionStrategy;

fn bench_morphology(c: &mut Criterion) {
    let mut group = c.benchmark_group("Morphology");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for kernel_size in [3, 5, 9].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * *kernel_size * *kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            let image_data = (0..width * height)
                .map(|i| ((i * 37) % 251) as u8)
                .collect::<Vec<_>>();
            let image = Image::<u8, 1>::new(
                ImageSize {
                    width: *width,
                    height: *height,
                },
                image_data,
            )
            .unwrap();

            let kernel = Kernel::new(KernelShape::Box { size: *kernel_size });

            for (name, strategy) in [
                ("serial", ExecutionStrategy::Serial),
                ("parallel_rows", ExecutionStrategy::ParallelRows),
            ] {
                let options = MorphOptions::default().with_strategy(strategy);

                group.bench_with_input(
                    BenchmarkId::new(format!("erode_{name}"), &parameter_string),
                    &image,
                    |b, i| b.iter(|| black_box(erode_with_options(i, &kernel, &options))),
                );

                group.bench_with_input(
                    BenchmarkId::new(format!("dilate_{name}"), &parameter_string),
                    &image,
                    |b, i| b.iter(|| black_box(dilate_with_options(i, &kernel, &options))),
                );
            }

            group.bench_with_input(
                BenchmarkId::new("open", &parameter_string),
                &image,
                |b, i| {
                    b.iter(|| {
                        black_box(morphology_ex(
                            i,
                            MorphOp::Open,
                            &kernel,
                            &MorphOptions::default(),
                        ))
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_morphology);
criterion_main!(benches);
