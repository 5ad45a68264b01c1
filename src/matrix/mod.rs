//! Matrix buffers, storage orders and the unblocked reference kernels.
//!
//! The naive kernels here are the correctness baselines every blocked or
//! threaded path is checked against.

pub mod layout;
pub mod naive;

pub use layout::{BLayout, ColumnMajor, Dims, Fill, Matrix, RowMajor, StorageOrder, init};
