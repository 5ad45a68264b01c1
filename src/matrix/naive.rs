use super::layout::{BLayout, ColumnMajor, Dims, RowMajor};

/// Textbook i-j-k multiplication, generic over B's storage order.
///
/// Each C[i][j] is summed in a local accumulator over the full k range
/// and written once, so C does not need to be zeroed first.
///
/// # Arguments
///
/// * `a` - Matrix A (m × n), row-major
/// * `b` - Matrix B (n × p), stored as `L`
/// * `c` - Matrix C (m × p), row-major, overwritten
pub fn matmul_naive<L: BLayout>(a: &[f64], b: &[f64], c: &mut [f64], dims: Dims) {
    let Dims { m, n, p } = dims;
    debug_assert_eq!(a.len(), m * n);
    debug_assert_eq!(b.len(), n * p);
    debug_assert_eq!(c.len(), m * p);

    for i in 0..m {
        let a_row = &a[i * n..(i + 1) * n];
        for j in 0..p {
            let mut sum = 0.0;
            for (k, &a_ik) in a_row.iter().enumerate() {
                sum += a_ik * b[L::offset(k, j, n, p)];
            }
            c[i * p + j] = sum;
        }
    }
}

/// Naive multiply with both operands row-major.
///
/// The inner loop reads B with stride `p`, which misses cache on every
/// step once B outgrows it. This is the slow baseline.
pub fn matmul_naive_row_row(a: &[f64], b: &[f64], c: &mut [f64], dims: Dims) {
    matmul_naive::<RowMajor>(a, b, c, dims);
}

/// Naive multiply with B column-major (`b_col[j * n + k]` = B[k][j]).
///
/// Both inner-loop streams are now contiguous.
pub fn matmul_naive_row_col(a: &[f64], b_col: &[f64], c: &mut [f64], dims: Dims) {
    matmul_naive::<ColumnMajor>(a, b_col, c, dims);
}
