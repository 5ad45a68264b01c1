//! Three-level blocked GEMM, single thread.

use std::ops::Range;

use crate::matrix::layout::{BLayout, ColumnMajor, Dims};

/// Tile edges starting at 0 and clamped to `len`.
#[inline]
pub(crate) fn tile_ranges(len: usize, block: usize) -> impl Iterator<Item = Range<usize>> {
    (0..len).step_by(block).map(move |start| start..(start + block).min(len))
}

/// Accumulate one row strip of a tile: `c_row[jj] += A[i][k] * B[k][j0 + jj]`
/// for every k in `ks`.
///
/// `a_ik` is hoisted out of the j loop, so the inner loop only streams the
/// C strip and B. With column-major B that stream is contiguous.
#[inline(always)]
pub(crate) fn accumulate_row<L: BLayout>(
    a: &[f64],
    b: &[f64],
    c_row: &mut [f64],
    i: usize,
    ks: Range<usize>,
    j0: usize,
    dims: Dims,
) {
    let Dims { n, p, .. } = dims;
    for k in ks {
        let a_ik = a[i * n + k];
        for (jj, c_ij) in c_row.iter_mut().enumerate() {
            *c_ij += a_ik * b[L::offset(k, j0 + jj, n, p)];
        }
    }
}

/// Blocked matrix multiplication, generic over B's storage order.
///
/// Zeroes C (counted as kernel work), then walks tiles in
/// i-block → k-block → j-block order. Inside a tile the loops run
/// i → k → j. When `block_size >= max(m, n, p)` there is a single tile
/// and this is the plain i-k-j loop.
///
/// # Panics
///
/// Panics if `block_size` is 0.
pub fn matmul_blocked<L: BLayout>(
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    dims: Dims,
    block_size: usize,
) {
    assert!(block_size > 0, "block size must be at least 1");
    let Dims { m, n, p } = dims;
    debug_assert_eq!(a.len(), m * n);
    debug_assert_eq!(b.len(), n * p);
    debug_assert_eq!(c.len(), m * p);

    c.fill(0.0);

    for i_blk in tile_ranges(m, block_size) {
        for k_blk in tile_ranges(n, block_size) {
            for j_blk in tile_ranges(p, block_size) {
                for i in i_blk.clone() {
                    let c_row = &mut c[i * p + j_blk.start..i * p + j_blk.end];
                    accumulate_row::<L>(a, b, c_row, i, k_blk.clone(), j_blk.start, dims);
                }
            }
        }
    }
}

/// Blocked multiply for row-major A and column-major B.
///
/// This is the configuration the whole benchmark is built around.
pub fn matmul_blocked_row_col(
    a: &[f64],
    b_col: &[f64],
    c: &mut [f64],
    dims: Dims,
    block_size: usize,
) {
    matmul_blocked::<ColumnMajor>(a, b_col, c, dims, block_size);
}
