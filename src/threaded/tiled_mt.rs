//! Tile-parallel version of [`crate::blocked::tiled`].

use std::ops::Range;

use rayon::ThreadPool;
use rayon::prelude::*;

use crate::blocked::tiled::{accumulate_row, tile_ranges};
use crate::matrix::layout::{BLayout, ColumnMajor, Dims};

/// One (i-block, j-block) tile of C, as disjoint mutable row strips.
struct Tile<'c> {
    rows: Range<usize>,
    cols: Range<usize>,
    strips: Vec<&'c mut [f64]>,
}

/// Carve a row-major `m × p` C into non-overlapping tiles.
///
/// Each row of C is split at the j-block edges and each strip goes to the
/// tile that owns it, so tiles can be handed to different threads without
/// any shared mutable state.
fn carve_tiles(c: &mut [f64], m: usize, p: usize, block: usize) -> Vec<Tile<'_>> {
    let col_blocks: Vec<Range<usize>> = tile_ranges(p, block).collect();
    let mut out = Vec::with_capacity(m.div_ceil(block) * col_blocks.len());

    for (band, i_blk) in c.chunks_mut(block * p).zip(tile_ranges(m, block)) {
        let mut band_tiles: Vec<Tile<'_>> = col_blocks
            .iter()
            .map(|cols| Tile {
                rows: i_blk.clone(),
                cols: cols.clone(),
                strips: Vec::with_capacity(i_blk.len()),
            })
            .collect();

        for row in band.chunks_mut(p) {
            for (tile, strip) in band_tiles.iter_mut().zip(row.chunks_mut(block)) {
                tile.strips.push(strip);
            }
        }
        out.extend(band_tiles);
    }
    out
}

/// Blocked multiplication with tiles distributed over `pool`.
///
/// Zeroing C runs on the pool as well, one row per task. Then every
/// (i-block, j-block) tile becomes its own task; inside a task the
/// k-blocks and the i → k → j loops run exactly as in the serial kernel.
/// The thread count is whatever `pool` was built with. A block larger
/// than every dimension is treated as one tile.
///
/// # Panics
///
/// Panics if `block_size` is 0.
pub fn matmul_blocked_mt<L: BLayout>(
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    dims: Dims,
    block_size: usize,
    pool: &ThreadPool,
) {
    assert!(block_size > 0, "block size must be at least 1");
    let Dims { m, n, p } = dims;
    // keeps `block * p` in carve_tiles from overflowing
    let block_size = block_size.min(dims.max_dim().max(1));
    debug_assert_eq!(a.len(), m * n);
    debug_assert_eq!(b.len(), n * p);
    debug_assert_eq!(c.len(), m * p);

    pool.install(|| {
        c.par_chunks_mut(p).for_each(|row| row.fill(0.0));

        carve_tiles(c, m, p, block_size)
            .into_par_iter()
            .with_max_len(1)
            .for_each(|mut tile| {
                for k_blk in tile_ranges(n, block_size) {
                    for (r, strip) in tile.strips.iter_mut().enumerate() {
                        let i = tile.rows.start + r;
                        accumulate_row::<L>(a, b, strip, i, k_blk.clone(), tile.cols.start, dims);
                    }
                }
            });
    });
}

/// Tile-parallel multiply for row-major A and column-major B.
pub fn matmul_blocked_row_col_mt(
    a: &[f64],
    b_col: &[f64],
    c: &mut [f64],
    dims: Dims,
    block_size: usize,
    pool: &ThreadPool,
) {
    matmul_blocked_mt::<ColumnMajor>(a, b_col, c, dims, block_size, pool);
}
