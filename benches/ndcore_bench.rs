use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndcore::{zip_map, NdArray, Shape, Slice};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_array(rows: usize, cols: usize, seed: u64) -> NdArray<'static, f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    match NdArray::from_fn(Shape::new(rows, cols), |_, _| rng.gen_range(-1.0..1.0)) {
        Ok(a) => a,
        Err(err) => panic!("allocation failed: {err}"),
    }
}

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    for size in [64usize, 256, 1024] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let a = random_array(size, size, 1);

        group.bench_with_input(BenchmarkId::new("at2_checked", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0;
                for r in 0..n {
                    for c in 0..n {
                        if let Ok(x) = a.at2(r, c) {
                            acc += x;
                        }
                    }
                }
                black_box(acc)
            })
        });

        group.bench_with_input(BenchmarkId::new("rows_iter", size), &size, |b, _| {
            b.iter(|| {
                let acc: f64 = a.rows_iter().map(|row| row.iter().sum::<f64>()).sum();
                black_box(acc)
            })
        });
    }
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    for size in [100usize, 500, 1000] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let a = random_array(size, size, 2);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(a.transpose()))
        });
    }
    group.finish();
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("zip_map_broadcast");
    for size in [100usize, 500, 1000] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let col = random_array(size, 1, 3);
        let row = random_array(1, size, 4);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(zip_map(&col, &row, |x, y| x * y)))
        });
    }
    group.finish();
}

fn bench_slice(c: &mut Criterion) {
    let a = random_array(1000, 1000, 5);
    let rows = Slice::new(None, None, -2);
    let cols = Slice::range(100, 900);
    c.bench_function("slice2_strided", |b| {
        b.iter(|| black_box(a.slice2(&rows, &cols)))
    });
}

criterion_group!(benches, bench_indexing, bench_transpose, bench_broadcast, bench_slice);
criterion_main!(benches);
