//! How much does memory layout matter for matrix multiplication?
//!
//! I built this to measure it. The answer turns out to be: a lot. Storing
//! B column-major so the inner loop walks two contiguous streams, then
//! tiling the loops so those streams stay in cache, then spreading the
//! tiles over threads. This crate has each of those steps as a kernel
//! and a driver that sweeps problem size, block size and thread count.
//!
//! ## Usage
//!
//! ```
//! use blockmm::multiply;
//!
//! let a = vec![1.0f64; 256 * 256];
//! let b_col = vec![1.0f64; 256 * 256];
//! let mut c = vec![0.0f64; 256 * 256];
//!
//! multiply(&a, &b_col, &mut c, 256, 256, 256, 64);
//! assert!(c.iter().all(|&x| x == 256.0));
//! ```
//!
//! For the multi-threaded version, or to pick the operand order and
//! blocking yourself, build a [`Kernel`]:
//!
//! ```
//! use blockmm::{Dims, Kernel, KernelConfig};
//!
//! let kernel = Kernel::new(KernelConfig::row_col(64).with_threads(4)).unwrap();
//! let a = vec![1.0f64; 300 * 300];
//! let b_col = vec![1.0f64; 300 * 300];
//! let mut c = vec![0.0f64; 300 * 300];
//!
//! kernel.multiply(&a, &b_col, &mut c, Dims::square(300));
//! ```
//!
//! ## What's inside
//!
//! - Naive i-j-k kernels for row-major and column-major B
//! - Three-level (i, k, j) cache blocking
//! - Tile-parallel blocking on a dedicated rayon pool
//! - A sweep driver with result verification and timing tables

pub mod blocked;
pub mod driver;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod report;
pub mod threaded;
pub mod verify;

pub use driver::{Benchmark, Check, FillPlan, Sweep, SweepPoint, Variant};
pub use error::{Error, Result};
pub use kernel::{Blocking, Kernel, KernelConfig, Parallelism};
pub use matrix::naive::{matmul_naive_row_col, matmul_naive_row_row};
pub use matrix::{Dims, Fill, Matrix, StorageOrder, init};
pub use report::{Record, Sink, format_elapsed};
pub use verify::{TOLERANCE, verify_pair, verify_scalar};

/// Blocked matrix multiply: C = A * B
///
/// A is m×n row-major, B is n×p stored column-major (`b_col[j * n + k]`
/// is B[k][j]), C is m×p row-major and gets overwritten.
///
/// # Panics
///
/// Panics if the slice sizes don't match m, n, p or `block_size` is 0.
pub fn multiply(
    a: &[f64],
    b_col: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    p: usize,
    block_size: usize,
) {
    assert_eq!(a.len(), m * n, "A: expected {}x{}={} elements", m, n, m * n);
    assert_eq!(b_col.len(), n * p, "B: expected {}x{}={} elements", n, p, n * p);
    assert_eq!(c.len(), m * p, "C: expected {}x{}={} elements", m, p, m * p);

    blocked::matmul_blocked_row_col(a, b_col, c, Dims::new(m, n, p), block_size);
}

/// Same as [`multiply`] but on `num_threads` workers.
///
/// Builds a pool for this one call. To time many calls without paying for
/// that each time, keep a [`Kernel`] around instead.
#[allow(clippy::too_many_arguments)]
pub fn multiply_parallel(
    a: &[f64],
    b_col: &[f64],
    c: &mut [f64],
    m: usize,
    n: usize,
    p: usize,
    block_size: usize,
    num_threads: usize,
) -> Result<()> {
    assert_eq!(a.len(), m * n, "A: expected {}x{}={} elements", m, n, m * n);
    assert_eq!(b_col.len(), n * p, "B: expected {}x{}={} elements", n, p, n * p);
    assert_eq!(c.len(), m * p, "C: expected {}x{}={} elements", m, p, m * p);

    let kernel = Kernel::new(KernelConfig::row_col(block_size).with_threads(num_threads))?;
    kernel.multiply(a, b_col, c, Dims::new(m, n, p));
    Ok(())
}
