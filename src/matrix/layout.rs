//! Storage orders and the layout initializer.

use rand::{Rng, RngCore};

/// How a logical 2-D matrix is linearized in its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOrder {
    /// Element (i, j) at `i * cols + j`.
    RowMajor,
    /// Element (i, j) at `j * rows + i`.
    ColumnMajor,
}

impl StorageOrder {
    /// Linear offset of element (i, j) in a `rows × cols` buffer.
    #[inline]
    pub fn index(self, i: usize, j: usize, rows: usize, cols: usize) -> usize {
        match self {
            StorageOrder::RowMajor => i * cols + j,
            StorageOrder::ColumnMajor => j * rows + i,
        }
    }
}

/// Problem shape for C = A × B.
///
/// A is `m × n`, B is `n × p`, C is `m × p`. All three must be non-zero;
/// that is the caller's job, nothing here checks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub m: usize,
    pub n: usize,
    pub p: usize,
}

impl Dims {
    pub fn new(m: usize, n: usize, p: usize) -> Self {
        Self { m, n, p }
    }

    pub fn square(dim: usize) -> Self {
        Self::new(dim, dim, dim)
    }

    /// One multiply and one add per inner-product term.
    pub fn flops(&self) -> f64 {
        2.0 * self.m as f64 * self.n as f64 * self.p as f64
    }

    pub fn max_dim(&self) -> usize {
        self.m.max(self.n).max(self.p)
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.m == self.n && self.n == self.p {
            write!(f, "{}x{}", self.m, self.m)
        } else {
            write!(f, "{}x{}x{}", self.m, self.n, self.p)
        }
    }
}

/// Compile-time view of B's storage order.
///
/// The kernels are generic over this so that the row-major and
/// column-major paths share one loop nest but still get a fixed,
/// inlined index expression in the hot loop.
pub trait BLayout: Copy + Send + Sync + 'static {
    const ORDER: StorageOrder;

    /// Offset of logical B[k][j] for an `n × p` B.
    fn offset(k: usize, j: usize, n: usize, p: usize) -> usize;
}

/// B stored row by row: the inner j loop strides through memory by 1
/// but every k step jumps a full row.
#[derive(Debug, Clone, Copy)]
pub struct RowMajor;

/// B stored column by column, so `b[j * n + k]` walks contiguously in k.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMajor;

impl BLayout for RowMajor {
    const ORDER: StorageOrder = StorageOrder::RowMajor;

    #[inline(always)]
    fn offset(k: usize, j: usize, _n: usize, p: usize) -> usize {
        k * p + j
    }
}

impl BLayout for ColumnMajor {
    const ORDER: StorageOrder = StorageOrder::ColumnMajor;

    #[inline(always)]
    fn offset(k: usize, j: usize, n: usize, _p: usize) -> usize {
        j * n + k
    }
}

/// Source of values for [`init`].
pub enum Fill<'a> {
    /// Every element gets the same value.
    Constant(f64),
    /// Each element draws the next value in `[0, 1)` from the stream, in
    /// traversal order.
    Random(&'a mut dyn RngCore),
}

impl Fill<'_> {
    #[inline]
    fn next(&mut self) -> f64 {
        match self {
            Fill::Constant(v) => *v,
            Fill::Random(rng) => rng.r#gen::<f64>(),
        }
    }
}

/// Fill a `rows × cols` buffer in the given storage order.
///
/// Row-major walks rows outermost, column-major walks columns outermost,
/// so each writes its buffer front to back. With a constant fill the two
/// orders hold the same logical matrix. With a random fill they don't:
/// the traversal decides which draw lands in which cell.
pub fn init(buf: &mut [f64], rows: usize, cols: usize, order: StorageOrder, mut fill: Fill<'_>) {
    debug_assert_eq!(buf.len(), rows * cols);
    match order {
        StorageOrder::RowMajor => {
            for i in 0..rows {
                for j in 0..cols {
                    buf[i * cols + j] = fill.next();
                }
            }
        }
        StorageOrder::ColumnMajor => {
            for j in 0..cols {
                for i in 0..rows {
                    buf[j * rows + i] = fill.next();
                }
            }
        }
    }
}

/// An owned buffer that remembers its shape and storage order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub data: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
    pub order: StorageOrder,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize, order: StorageOrder) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
            order,
        }
    }

    pub fn filled(rows: usize, cols: usize, order: StorageOrder, fill: Fill<'_>) -> Self {
        let mut mat = Self::zeros(rows, cols, order);
        init(&mut mat.data, rows, cols, order, fill);
        mat
    }

    /// Logical element (i, j), whatever the storage order.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.order.index(i, j, self.rows, self.cols)]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
