use blockmm::{Dims, Fill, Kernel, KernelConfig, Matrix, StorageOrder};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

const SIZES: &[usize] = &[128, 256, 512];

fn operands(n: usize, b_order: StorageOrder) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(0xC0FF_EE42 ^ n as u64);
    let a = Matrix::filled(n, n, StorageOrder::RowMajor, Fill::Random(&mut rng));
    let b = Matrix::filled(n, n, b_order, Fill::Random(&mut rng));
    (a, b)
}

fn bench_config(c: &mut Criterion, name: &str, config: KernelConfig) {
    let kernel = Kernel::new(config).unwrap();
    let mut group = c.benchmark_group(name);

    for &n in SIZES {
        let dims = Dims::square(n);
        let (a, b) = operands(n, config.b_order);
        let mut out = vec![0.0; n * n];
        group.throughput(Throughput::Elements(dims.flops() as u64));

        group.bench_function(BenchmarkId::from_parameter(n), |bench| {
            bench.iter(|| {
                kernel.multiply(black_box(&a.data), black_box(&b.data), black_box(&mut out), dims);
                black_box(out[(n / 2) * n + n / 2]);
            });
        });
    }
    group.finish();
}

fn bench_matmul(c: &mut Criterion) {
    bench_config(c, "naive_row_row", KernelConfig::naive_row_row());
    bench_config(c, "naive_row_col", KernelConfig::naive_row_col());
    for block in [16, 64, 128] {
        bench_config(c, &format!("blocked_b{block}"), KernelConfig::row_col(block));
    }
    bench_config(c, "blocked_b64_mt4", KernelConfig::row_col(64).with_threads(4));
}

criterion_group!(benches, bench_matmul);
criterion_main!(benches);
