//! Configuration sweeps.
//!
//! A [`Sweep`] is three independent axes (problem size, block size,
//! thread count). The points are their Cartesian product, so a sweep that
//! varies only one axis just leaves the other two with a single value.

use std::fmt;

use crate::matrix::Dims;

/// One configuration the driver measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPoint {
    pub dims: Dims,
    pub block: usize,
    pub threads: usize,
}

impl fmt::Display for SweepPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} block={} threads={}",
            self.dims, self.block, self.threads
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweep {
    dims: Vec<Dims>,
    blocks: Vec<usize>,
    threads: Vec<usize>,
}

impl Default for Sweep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sweep {
    /// 1000×1000, block 64, one thread.
    pub fn new() -> Self {
        Self {
            dims: vec![Dims::square(1000)],
            blocks: vec![64],
            threads: vec![1],
        }
    }

    pub fn dims(mut self, dims: impl IntoIterator<Item = Dims>) -> Self {
        self.dims = dims.into_iter().collect();
        self
    }

    /// Square problems of the given edge lengths.
    pub fn square(self, sizes: impl IntoIterator<Item = usize>) -> Self {
        self.dims(sizes.into_iter().map(Dims::square))
    }

    pub fn blocks(mut self, blocks: impl IntoIterator<Item = usize>) -> Self {
        self.blocks = blocks.into_iter().collect();
        self
    }

    pub fn threads(mut self, threads: impl IntoIterator<Item = usize>) -> Self {
        self.threads = threads.into_iter().collect();
        self
    }

    /// Every combination, dims outermost and threads innermost.
    pub fn points(&self) -> impl Iterator<Item = SweepPoint> + '_ {
        self.dims.iter().flat_map(move |&dims| {
            self.blocks.iter().flat_map(move |&block| {
                self.threads
                    .iter()
                    .map(move |&threads| SweepPoint {
                        dims,
                        block,
                        threads,
                    })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.dims.len() * self.blocks.len() * self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `start, 2·start, 4·start, …` up to and including `cap`.
pub fn doubling(start: usize, cap: usize) -> Vec<usize> {
    std::iter::successors(Some(start.max(1)), |&b| b.checked_mul(2))
        .take_while(|&b| b <= cap)
        .collect()
}

/// `start, start + step, …` up to and including `end`.
pub fn stepping(start: usize, end: usize, step: usize) -> Vec<usize> {
    (start..=end).step_by(step.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubling() {
        assert_eq!(doubling(16, 128), vec![16, 32, 64, 128]);
        assert_eq!(doubling(16, 100), vec![16, 32, 64]);
        assert!(doubling(16, 8).is_empty());
    }

    #[test]
    fn test_stepping() {
        assert_eq!(
            stepping(100, 1000, 100),
            vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]
        );
        assert_eq!(stepping(100, 250, 100), vec![100, 200]);
    }

    #[test]
    fn test_points_cartesian_order() {
        let sweep = Sweep::new().square([10, 20]).blocks([4, 8]).threads([1, 2]);
        let points: Vec<_> = sweep.points().collect();

        assert_eq!(points.len(), 8);
        assert_eq!(sweep.len(), 8);
        assert_eq!(
            points[0],
            SweepPoint {
                dims: Dims::square(10),
                block: 4,
                threads: 1
            }
        );
        assert_eq!(points[1].threads, 2);
        assert_eq!(points[2].block, 8);
        assert_eq!(points[4].dims, Dims::square(20));
    }

    #[test]
    fn test_single_axis_sweep() {
        let sweep = Sweep::new().blocks(doubling(16, 128));
        let blocks: Vec<_> = sweep.points().map(|p| p.block).collect();
        assert_eq!(blocks, vec![16, 32, 64, 128]);
        assert!(sweep.points().all(|p| p.dims == Dims::square(1000)));
    }
}
