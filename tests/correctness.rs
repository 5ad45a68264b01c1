use blockmm::blocked::{matmul_blocked, matmul_blocked_row_col};
use blockmm::matrix::{ColumnMajor, RowMajor};
use blockmm::threaded::matmul_blocked_row_col_mt;
use blockmm::{
    Dims, Fill, Kernel, KernelConfig, Matrix, StorageOrder, matmul_naive_row_col,
    matmul_naive_row_row, multiply, multiply_parallel, verify_pair, verify_scalar,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn assert_matrices_equal(expected: &[f64], actual: &[f64], name: &str) {
    if let Err(mismatch) = verify_pair(actual, expected) {
        panic!("{}: {}", name, mismatch);
    }
}

/// Row-major A and column-major B with the same logical values as the
/// row-major B returned alongside.
fn operands(dims: Dims, seed: u64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = Matrix::filled(dims.m, dims.n, StorageOrder::RowMajor, Fill::Random(&mut rng));
    let b = Matrix::filled(dims.n, dims.p, StorageOrder::RowMajor, Fill::Random(&mut rng));

    let mut b_col = vec![0.0; dims.n * dims.p];
    for k in 0..dims.n {
        for j in 0..dims.p {
            b_col[j * dims.n + k] = b.get(k, j);
        }
    }
    (a.data, b.data, b_col)
}

fn pool(threads: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .unwrap()
}

// ============================================================
// Small matrix tests
// ============================================================

#[test]
fn test_2x2_row_col() {
    let a = vec![1.0, 2.0, 3.0, 4.0];
    let b_col = vec![5.0, 7.0, 6.0, 8.0]; // logical [[5, 6], [7, 8]]
    let mut c = vec![0.0; 4];

    multiply(&a, &b_col, &mut c, 2, 2, 2, 2);

    assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
}

#[test]
fn test_2x3_times_3x2() {
    let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // 2x3
    let b = vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]; // 3x2
    let b_col = vec![7.0, 9.0, 11.0, 8.0, 10.0, 12.0];

    let mut c_naive = vec![0.0; 4];
    let mut c_fast = vec![0.0; 4];

    matmul_naive_row_row(&a, &b, &mut c_naive, Dims::new(2, 3, 2));
    multiply(&a, &b_col, &mut c_fast, 2, 3, 2, 2);

    assert_eq!(c_naive, vec![58.0, 64.0, 139.0, 154.0]);
    assert_matrices_equal(&c_naive, &c_fast, "2x3 * 3x2");
}

#[test]
fn test_1x1_is_scalar_product() {
    let mut c = vec![0.0];
    multiply(&[1.5], &[4.0], &mut c, 1, 1, 1, 1);
    assert_eq!(c, vec![6.0]);

    multiply_parallel(&[1.5], &[4.0], &mut c, 1, 1, 1, 16, 4).unwrap();
    assert_eq!(c, vec![6.0]);
}

#[test]
fn test_small_odd_sizes() {
    let test_sizes = [
        (3, 3, 3),
        (5, 5, 5),
        (7, 7, 7),
        (3, 5, 7),
        (7, 3, 5),
        (11, 13, 17),
    ];

    for (m, n, p) in test_sizes {
        let dims = Dims::new(m, n, p);
        let (a, b, b_col) = operands(dims, (m * 100 + n * 10 + p) as u64);

        let mut c_naive = vec![0.0; m * p];
        let mut c_fast = vec![0.0; m * p];

        matmul_naive_row_row(&a, &b, &mut c_naive, dims);
        multiply(&a, &b_col, &mut c_fast, m, n, p, 4);

        assert_matrices_equal(&c_naive, &c_fast, &format!("{}x{}x{}", m, n, p));
    }
}

// ============================================================
// Block size invariance
// ============================================================

#[test]
fn test_block_size_invariance() {
    for size in [15, 16, 17, 64, 65, 100] {
        let dims = Dims::square(size);
        let (a, _, b_col) = operands(dims, size as u64);

        let mut reference = vec![0.0; size * size];
        matmul_naive_row_col(&a, &b_col, &mut reference, dims);

        for block in [1, 7, 16, 64, size] {
            let mut c = vec![0.0; size * size];
            matmul_blocked_row_col(&a, &b_col, &mut c, dims, block);
            assert_matrices_equal(&reference, &c, &format!("size_{}_block_{}", size, block));
        }
    }
}

#[test]
fn test_block_larger_than_problem_is_naive() {
    let dims = Dims::new(9, 21, 14);
    let (a, _, b_col) = operands(dims, 99);

    let mut naive = vec![0.0; dims.m * dims.p];
    let mut huge_block = vec![0.0; dims.m * dims.p];

    matmul_naive_row_col(&a, &b_col, &mut naive, dims);
    matmul_blocked_row_col(&a, &b_col, &mut huge_block, dims, 1 << 20);

    assert_matrices_equal(&naive, &huge_block, "block >= max dim");
}

#[test]
fn test_row_major_b_blocked() {
    let dims = Dims::new(31, 29, 37);
    let (a, b, b_col) = operands(dims, 5);

    let mut c_row = vec![0.0; dims.m * dims.p];
    let mut c_col = vec![0.0; dims.m * dims.p];

    matmul_blocked::<RowMajor>(&a, &b, &mut c_row, dims, 8);
    matmul_blocked::<ColumnMajor>(&a, &b_col, &mut c_col, dims, 8);

    assert_matrices_equal(&c_row, &c_col, "row-major vs column-major B");
}

// ============================================================
// Constant fill: every cell equals n
// ============================================================

#[test]
fn test_constant_fill_equals_inner_dim() {
    let dims = Dims::new(40, 123, 50);
    let a = Matrix::filled(dims.m, dims.n, StorageOrder::RowMajor, Fill::Constant(1.0));
    let b = Matrix::filled(dims.n, dims.p, StorageOrder::ColumnMajor, Fill::Constant(1.0));

    for block in [1, 16, 64, 200] {
        for threads in [1, 2, 4] {
            let kernel = Kernel::new(KernelConfig::row_col(block).with_threads(threads)).unwrap();
            let mut c = vec![-1.0; dims.m * dims.p];
            kernel.multiply(&a.data, &b.data, &mut c, dims);

            if let Err(mismatch) = verify_scalar(&c, dims.n as f64) {
                panic!("block {} threads {}: {}", block, threads, mismatch);
            }
        }
    }
}

// ============================================================
// Multi-threaded tests
// ============================================================

#[test]
fn test_parallel_matches_single_threaded() {
    for size in [64, 128, 200] {
        let dims = Dims::square(size);
        let (a, _, b_col) = operands(dims, size as u64 + 1);

        let mut c_single = vec![0.0; size * size];
        let mut c_parallel = vec![0.0; size * size];

        multiply(&a, &b_col, &mut c_single, size, size, size, 32);
        multiply_parallel(&a, &b_col, &mut c_parallel, size, size, size, 32, 4).unwrap();

        assert_matrices_equal(&c_single, &c_parallel, &format!("parallel_size_{}", size));
    }
}

#[test]
fn test_parallel_more_threads_than_tiles() {
    let dims = Dims::new(5, 7, 3);
    let (a, b, b_col) = operands(dims, 17);

    let mut c_naive = vec![0.0; dims.m * dims.p];
    let mut c_mt = vec![0.0; dims.m * dims.p];

    matmul_naive_row_row(&a, &b, &mut c_naive, dims);
    matmul_blocked_row_col_mt(&a, &b_col, &mut c_mt, dims, 64, &pool(8));

    assert_matrices_equal(&c_naive, &c_mt, "parallel_small");
}

#[test]
fn test_kernel_reused_across_calls() {
    let kernel = Kernel::new(KernelConfig::row_col(16).with_threads(3)).unwrap();

    for size in [10, 33, 48] {
        let dims = Dims::square(size);
        let (a, b, b_col) = operands(dims, 1000 + size as u64);

        let mut expected = vec![0.0; size * size];
        let mut c = vec![f64::NAN; size * size];

        matmul_naive_row_row(&a, &b, &mut expected, dims);
        kernel.multiply(&a, &b_col, &mut c, dims);

        assert_matrices_equal(&expected, &c, &format!("reuse_{}", size));
    }
}

// ============================================================
// Non-square matrix tests
// ============================================================

#[test]
fn test_non_square_matrices() {
    let test_cases = [
        (32, 64, 48),  // wide inner
        (64, 32, 48),  // tall result
        (100, 50, 75), // odd sizes
        (48, 100, 48), // deep n
        (13, 17, 19),  // primes
        (1, 50, 1),    // dot product
        (50, 1, 50),   // outer product
    ];

    for (m, n, p) in test_cases {
        let dims = Dims::new(m, n, p);
        let (a, b, b_col) = operands(dims, (m + n + p) as u64);

        let mut c_naive = vec![0.0; m * p];
        let mut c_blocked = vec![0.0; m * p];
        let mut c_mt = vec![0.0; m * p];

        matmul_naive_row_row(&a, &b, &mut c_naive, dims);
        multiply(&a, &b_col, &mut c_blocked, m, n, p, 16);
        multiply_parallel(&a, &b_col, &mut c_mt, m, n, p, 16, 4).unwrap();

        let name = format!("non_square_{}x{}x{}", m, n, p);
        assert_matrices_equal(&c_naive, &c_blocked, &name);
        assert_matrices_equal(&c_naive, &c_mt, &name);
    }
}

// ============================================================
// Overwrite test (C = A*B, not C += A*B)
// ============================================================

#[test]
fn test_result_overwrites_c() {
    let size = 64;
    let dims = Dims::square(size);
    let (a, b, b_col) = operands(dims, 64);

    let mut c_naive = vec![0.0; size * size];
    let mut c_fast = vec![5.0; size * size];
    let mut c_mt = vec![5.0; size * size];

    matmul_naive_row_row(&a, &b, &mut c_naive, dims);
    multiply(&a, &b_col, &mut c_fast, size, size, size, 16);
    multiply_parallel(&a, &b_col, &mut c_mt, size, size, size, 16, 2).unwrap();

    assert_matrices_equal(&c_naive, &c_fast, "overwrite");
    assert_matrices_equal(&c_naive, &c_mt, "overwrite_mt");
}
