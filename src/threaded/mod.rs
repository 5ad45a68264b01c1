//! Multi-threaded blocked GEMM.
//!
//! The (i-block, j-block) tile grid of C is the unit of parallel work.
//! Tiles are handed out dynamically by rayon's work-stealing scheduler,
//! and every tile runs the full k range, so each C cell has exactly one
//! writer and no atomics or reductions are needed.

pub mod tiled_mt;

pub use tiled_mt::{matmul_blocked_mt, matmul_blocked_row_col_mt};
