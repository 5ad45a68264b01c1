//! Benchmark driver: allocate, initialize, time, verify, report.
//!
//! Points run strictly one after another so timings never compete for
//! cores. Everything a point allocates is dropped before the next one
//! starts.

pub mod sweep;

pub use sweep::{Sweep, SweepPoint, doubling, stepping};

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::kernel::{Blocking, Kernel, KernelConfig, Parallelism};
use crate::matrix::{Dims, Fill, Matrix, StorageOrder};
use crate::report::{Record, Sink};
use crate::verify::{verify_pair, verify_scalar};

/// Default seed for the operand generator.
pub const DEFAULT_SEED: u64 = 0x5EED_0000_B10C_4ED5;

/// Which multiply a benchmark measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Row-major A and B, i-j-k loop. Ignores block size and threads.
    NaiveRowRow,
    /// Row-major A, column-major B, i-j-k loop. Ignores block size and threads.
    NaiveRowCol,
    /// Row-major A, column-major B, blocked with the point's block size
    /// on the point's thread count.
    Blocked,
}

impl Variant {
    pub fn b_order(self) -> StorageOrder {
        match self {
            Variant::NaiveRowRow => StorageOrder::RowMajor,
            Variant::NaiveRowCol | Variant::Blocked => StorageOrder::ColumnMajor,
        }
    }

    fn config(self, point: &SweepPoint) -> KernelConfig {
        match self {
            Variant::NaiveRowRow => KernelConfig::naive_row_row(),
            Variant::NaiveRowCol => KernelConfig::naive_row_col(),
            Variant::Blocked => KernelConfig::row_col(point.block).with_threads(point.threads),
        }
    }
}

/// How operands are filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillPlan {
    /// A is all `a`, B is all `b`.
    Constant { a: f64, b: f64 },
    /// Both operands draw every element from the seeded stream.
    Random,
    /// A draws every element; B is one value drawn once and repeated.
    RandomConstant,
}

impl FillPlan {
    /// Build A (row-major `m × n`) and B (`n × p` in `b_order`).
    fn operands(self, dims: Dims, b_order: StorageOrder, rng: &mut StdRng) -> (Matrix, Matrix) {
        let Dims { m, n, p } = dims;
        match self {
            FillPlan::Constant { a, b } => (
                Matrix::filled(m, n, StorageOrder::RowMajor, Fill::Constant(a)),
                Matrix::filled(n, p, b_order, Fill::Constant(b)),
            ),
            FillPlan::Random => {
                let a = Matrix::filled(m, n, StorageOrder::RowMajor, Fill::Random(&mut *rng));
                let b = Matrix::filled(n, p, b_order, Fill::Random(&mut *rng));
                (a, b)
            }
            FillPlan::RandomConstant => {
                let a = Matrix::filled(m, n, StorageOrder::RowMajor, Fill::Random(&mut *rng));
                let value = rng.r#gen::<f64>();
                let b = Matrix::filled(n, p, b_order, Fill::Constant(value));
                (a, b)
            }
        }
    }
}

/// How each result is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Every cell must equal `a · b · n`. Needs a constant fill.
    Analytic,
    /// Recompute with the sequential unblocked i-k-j loop (one tile
    /// covering the whole problem) over the same layout and compare. With
    /// `timed`, the reference run's time is kept as the point's baseline,
    /// so speedup reads as the gain from blocking and threads.
    Reference { timed: bool },
    /// Skip verification.
    None,
}

/// A named benchmark: one variant, one fill plan, one check.
#[derive(Debug, Clone)]
pub struct Benchmark {
    pub name: String,
    pub variant: Variant,
    pub fill: FillPlan,
    pub check: Check,
    pub seed: u64,
}

impl Benchmark {
    /// Random operands checked against the naive reference.
    pub fn new(name: impl Into<String>, variant: Variant) -> Self {
        Self {
            name: name.into(),
            variant,
            fill: FillPlan::Random,
            check: Check::Reference { timed: false },
            seed: DEFAULT_SEED,
        }
    }

    pub fn fill(mut self, fill: FillPlan) -> Self {
        self.fill = fill;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.check = check;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.check == Check::Analytic && !matches!(self.fill, FillPlan::Constant { .. }) {
            return Err(Error::InvalidConfig(format!(
                "{}: analytic check needs constant-filled operands",
                self.name
            )));
        }
        Ok(())
    }

    /// Run every point of `sweep` in order, feeding each record to every
    /// sink.
    ///
    /// Stops at the first error; a failed verification means the remaining
    /// points are not run. Sinks are not finished here so that several
    /// benchmarks can share them.
    pub fn run(&self, sweep: &Sweep, sinks: &mut [&mut dyn Sink]) -> Result<Vec<Record>> {
        self.validate()?;
        info!(benchmark = %self.name, points = sweep.len(), "starting sweep");

        let mut records = Vec::with_capacity(sweep.len());
        for point in sweep.points() {
            let record = self.run_point(&point)?;
            for sink in sinks.iter_mut() {
                sink.record(&record)?;
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Measure a single point.
    pub fn run_point(&self, point: &SweepPoint) -> Result<Record> {
        self.validate()?;
        let dims = point.dims;
        let config = self.variant.config(point);
        let mut rng = StdRng::seed_from_u64(self.seed ^ dims.m as u64);

        let (a, b) = self.fill.operands(dims, self.variant.b_order(), &mut rng);
        let mut c = vec![0.0; dims.m * dims.p];

        let kernel = Kernel::new(config)?;
        kernel.note_degenerate(dims);
        debug!(benchmark = %self.name, %point, "operands ready");

        let start = Instant::now();
        kernel.multiply(a.as_slice(), b.as_slice(), &mut c, dims);
        let seconds = start.elapsed().as_secs_f64();

        let baseline_seconds = self.verify(point, &a, &b, &c)?;

        let record = Record {
            name: self.name.clone(),
            dims,
            block: match config.blocking {
                Blocking::Naive => None,
                Blocking::Tiled(block) => Some(block),
            },
            threads: config.parallelism.threads(),
            seconds,
            baseline_seconds,
        };
        info!(
            benchmark = %self.name,
            %point,
            seconds,
            gflops = record.gflops(),
            "point done"
        );
        Ok(record)
    }

    /// Returns the reference run's time when it was asked to be timed.
    fn verify(&self, point: &SweepPoint, a: &Matrix, b: &Matrix, c: &[f64]) -> Result<Option<f64>> {
        let dims = point.dims;
        let (outcome, baseline) = match (self.check, self.fill) {
            (Check::None, _) => return Ok(None),
            (Check::Analytic, FillPlan::Constant { a: va, b: vb }) => {
                (verify_scalar(c, va * vb * dims.n as f64), None)
            }
            (Check::Analytic, _) => {
                return Err(Error::InvalidConfig(
                    "analytic check needs constant-filled operands".into(),
                ));
            }
            (Check::Reference { timed }, _) => {
                let reference = Kernel::new(KernelConfig {
                    b_order: self.variant.b_order(),
                    blocking: Blocking::Tiled(dims.max_dim().max(1)),
                    parallelism: Parallelism::Sequential,
                })?;
                let mut expected = vec![0.0; dims.m * dims.p];
                let start = Instant::now();
                reference.multiply(a.as_slice(), b.as_slice(), &mut expected, dims);
                let elapsed = start.elapsed().as_secs_f64();
                (verify_pair(c, &expected), timed.then_some(elapsed))
            }
        };

        match outcome {
            Ok(()) => Ok(baseline),
            Err(mismatch) => {
                error!(benchmark = %self.name, %point, %mismatch, "verification failed");
                Err(Error::Verification {
                    benchmark: self.name.clone(),
                    point: point.to_string(),
                    mismatch,
                })
            }
        }
    }
}

/// What a [`run_suite`] call produced.
#[derive(Debug, Default)]
pub struct SuiteReport {
    /// Records of every point that passed, in run order.
    pub records: Vec<Record>,
    /// One `Error::Verification` per benchmark that stopped early.
    pub failures: Vec<Error>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run several benchmarks one after another into shared sinks.
///
/// A failed verification ends only the sweep it happened in; the next
/// benchmark still runs. Any other error is returned immediately. Sinks
/// are not finished here.
pub fn run_suite(
    benches: &[(Benchmark, Sweep)],
    sinks: &mut [&mut dyn Sink],
) -> Result<SuiteReport> {
    let mut report = SuiteReport::default();
    for (bench, sweep) in benches {
        match bench.run(sweep, sinks) {
            Ok(records) => report.records.extend(records),
            Err(err @ Error::Verification { .. }) => report.failures.push(err),
            Err(err) => return Err(err),
        }
    }
    Ok(report)
}
