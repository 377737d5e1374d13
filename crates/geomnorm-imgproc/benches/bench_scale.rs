use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use geomnorm_image::{Image, ImageSize};
use geomnorm_imgproc::scale::{scale, scale_by_factor};

fn bench_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scale");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image = Image::<u8, 3>::from_size_val([*width, *height].into(), 0).unwrap();
        let new_size = ImageSize {
            width: width / 2,
            height: height / 2,
        };
        let output = Image::<f64, 3>::from_size_val(new_size, 0.0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("half", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| scale(black_box(src), black_box(&mut dst)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("factor_3.18", &parameter_string),
            &image,
            |b, src| b.iter(|| scale_by_factor(black_box(src), black_box(3.18467))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_scale);
criterion_main!(benches);
