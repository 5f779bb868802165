use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rayo::{Matrix3, Matrix4, Vec3d, Vec3f};

fn sample_matrix4(seed: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vec3f::new(seed, -2.0 * seed, 3.0))
        * Matrix4::from_rotation_y(seed * 0.1)
        * Matrix4::from_scale(Vec3f::new(1.0 + seed, 2.0, 0.5))
}

fn bench_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_mul");

    let a = sample_matrix4(1.0);
    let b = sample_matrix4(2.0);
    group.bench_function("mat4_f32", |bench| {
        bench.iter(|| black_box(black_box(a) * black_box(b)));
    });

    let a3 = Matrix3::from_rotation_z(0.3f64);
    let b3 = Matrix3::from_rotation_z(1.1f64);
    group.bench_function("mat3_f64", |bench| {
        bench.iter(|| black_box(black_box(a3) * black_box(b3)));
    });

    group.bench_function("mat4_f32_mul_vec", |bench| {
        let v = Vec3f::new(1.0, 2.0, 3.0).extend_one();
        bench.iter(|| black_box(black_box(a).mul_vec(black_box(v))));
    });

    group.finish();
}

fn bench_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverse");

    // General inverse pays for the full adjugate; the affine and 3x3 paths
    // only invert the linear block.
    let m = sample_matrix4(1.5);
    group.bench_with_input(BenchmarkId::new("mat4", "general"), &m, |bench, m| {
        bench.iter(|| black_box(black_box(m).inverse()));
    });
    group.bench_with_input(BenchmarkId::new("mat4", "affine"), &m, |bench, m| {
        bench.iter(|| black_box(black_box(m).inverse_affine()));
    });
    group.bench_with_input(BenchmarkId::new("mat4", "determinant"), &m, |bench, m| {
        bench.iter(|| black_box(black_box(m).determinant()));
    });
    group.bench_with_input(BenchmarkId::new("mat4", "try_inverse"), &m, |bench, m| {
        bench.iter(|| black_box(black_box(m).try_inverse()));
    });

    let m3 = Matrix3::from_diagonal(Vec3d::new(2.0, 3.0, 4.0)) * Matrix3::from_rotation_z(0.7);
    group.bench_with_input(BenchmarkId::new("mat3", "general"), &m3, |bench, m| {
        bench.iter(|| black_box(black_box(m).inverse()));
    });

    group.finish();
}

fn bench_transform_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_point3");

    for count in [100, 1000, 10000] {
        let m = sample_matrix4(0.5);
        let points: Vec<Vec3f> = (0..count)
            .map(|i| Vec3f::new(i as f32, (i % 7) as f32, -(i as f32) * 0.5))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |bench, points| {
            bench.iter(|| {
                for p in points {
                    black_box(m.transform_point3(*p));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mul, bench_inverse, bench_transform_points);
criterion_main!(benches);
