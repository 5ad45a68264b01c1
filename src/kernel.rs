//! One entry point for every multiply variant.
//!
//! A [`Kernel`] is built from a [`KernelConfig`] naming B's storage
//! order, the blocking strategy and the parallelism strategy. The thread
//! pool, if any, is created once in [`Kernel::new`] so that building it
//! never lands inside a timed region, and nothing about the kernel lives
//! in process-wide state.

use rayon::ThreadPool;
use tracing::{debug, warn};

use crate::blocked::tiled::matmul_blocked;
use crate::error::{Error, Result};
use crate::matrix::layout::{BLayout, ColumnMajor, Dims, RowMajor, StorageOrder};
use crate::matrix::naive::matmul_naive;
use crate::threaded::tiled_mt::matmul_blocked_mt;

/// How the i, k, j loops are partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocking {
    /// Straight i-j-k triple loop, one accumulator per C cell.
    Naive,
    /// Square tiles with the given edge.
    Tiled(usize),
}

/// How many workers share one multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    /// A dedicated pool with exactly this many workers.
    Threads(usize),
}

impl Parallelism {
    pub fn threads(self) -> usize {
        match self {
            Parallelism::Sequential => 1,
            Parallelism::Threads(t) => t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Storage order of B. A is always row-major, C is always row-major.
    pub b_order: StorageOrder,
    pub blocking: Blocking,
    pub parallelism: Parallelism,
}

impl KernelConfig {
    /// Both operands row-major, no blocking, one thread.
    pub fn naive_row_row() -> Self {
        Self {
            b_order: StorageOrder::RowMajor,
            blocking: Blocking::Naive,
            parallelism: Parallelism::Sequential,
        }
    }

    /// Column-major B, no blocking, one thread.
    pub fn naive_row_col() -> Self {
        Self {
            b_order: StorageOrder::ColumnMajor,
            ..Self::naive_row_row()
        }
    }

    /// Column-major B with square tiles of edge `block`.
    pub fn row_col(block: usize) -> Self {
        Self {
            b_order: StorageOrder::ColumnMajor,
            blocking: Blocking::Tiled(block),
            parallelism: Parallelism::Sequential,
        }
    }

    /// Same configuration on `threads` workers. One thread means sequential.
    pub fn with_threads(self, threads: usize) -> Self {
        let parallelism = if threads == 1 {
            Parallelism::Sequential
        } else {
            Parallelism::Threads(threads)
        };
        Self {
            parallelism,
            ..self
        }
    }

    fn validate(&self) -> Result<()> {
        if let Blocking::Tiled(0) = self.blocking {
            return Err(Error::InvalidConfig("block size must be at least 1".into()));
        }
        if let Parallelism::Threads(0) = self.parallelism {
            return Err(Error::InvalidConfig("thread count must be at least 1".into()));
        }
        if self.blocking == Blocking::Naive && self.parallelism != Parallelism::Sequential {
            return Err(Error::InvalidConfig(
                "the naive loop is single-threaded; pick a block size to run in parallel".into(),
            ));
        }
        Ok(())
    }
}

/// A configured multiply, ready to be called repeatedly.
pub struct Kernel {
    config: KernelConfig,
    pool: Option<ThreadPool>,
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("config", &self.config)
            .field("pooled", &self.pool.is_some())
            .finish()
    }
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Result<Self> {
        config.validate()?;

        let pool = match config.parallelism {
            Parallelism::Sequential => None,
            Parallelism::Threads(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("blockmm-{i}"))
                    .build()?,
            ),
        };

        debug!(?config, "kernel ready");
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// C = A × B.
    ///
    /// A is row-major `m × n`, B is `n × p` in the configured order, C is
    /// row-major `m × p` and is fully overwritten. Slice lengths must match
    /// `dims`; that is only checked in debug builds.
    pub fn multiply(&self, a: &[f64], b: &[f64], c: &mut [f64], dims: Dims) {
        match self.config.b_order {
            StorageOrder::RowMajor => self.run::<RowMajor>(a, b, c, dims),
            StorageOrder::ColumnMajor => self.run::<ColumnMajor>(a, b, c, dims),
        }
    }

    fn run<L: BLayout>(&self, a: &[f64], b: &[f64], c: &mut [f64], dims: Dims) {
        debug_assert_eq!(L::ORDER, self.config.b_order);
        match (self.config.blocking, &self.pool) {
            (Blocking::Naive, _) => matmul_naive::<L>(a, b, c, dims),
            (Blocking::Tiled(block), None) => matmul_blocked::<L>(a, b, c, dims, block),
            (Blocking::Tiled(block), Some(pool)) => {
                matmul_blocked_mt::<L>(a, b, c, dims, block, pool)
            }
        }
    }

    /// Log once if this configuration will collapse to a single tile for
    /// `dims`. Kept out of [`Kernel::multiply`] so the hot path stays quiet.
    pub fn note_degenerate(&self, dims: Dims) {
        if let Blocking::Tiled(block) = self.config.blocking {
            if block >= dims.max_dim() {
                warn!(block, %dims, "block covers the whole problem; this is the unblocked loop");
            }
        }
    }
}
