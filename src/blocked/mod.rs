//! Cache-blocked GEMM.
//!
//! Splits the i, k and j loops into square tiles so the slice of A, the
//! panel of B and the strip of C touched by one tile stay resident in
//! cache while they are reused.

pub mod tiled;

pub use tiled::{matmul_blocked, matmul_blocked_row_col};
