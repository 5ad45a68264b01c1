//! Performance records and the sinks that consume them.
//!
//! A sink sees every record of a run in order and is finished once at
//! the end. Sinks never run inside a timed region.

pub mod console;
pub mod table;

pub use console::{ConsoleSink, SummarySink};
pub use table::TableSink;

use crate::error::Result;
use crate::matrix::Dims;

/// One measured configuration point.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Benchmark this point belongs to.
    pub name: String,
    pub dims: Dims,
    /// Tile edge, or `None` for the unblocked loop.
    pub block: Option<usize>,
    pub threads: usize,
    /// Wall-clock time of one kernel call.
    pub seconds: f64,
    /// Time of the reference run on the same operands, if one was timed.
    pub baseline_seconds: Option<f64>,
}

impl Record {
    pub fn gflops(&self) -> f64 {
        self.dims.flops() / self.seconds / 1e9
    }

    /// How many times faster than the baseline this point ran.
    pub fn speedup(&self) -> Option<f64> {
        self.baseline_seconds.map(|base| base / self.seconds)
    }
}

/// Destination for [`Record`]s.
pub trait Sink {
    fn record(&mut self, record: &Record) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

const UNITS: [(&str, f64); 4] = [("s", 1.0), ("ms", 1e3), ("µs", 1e6), ("ns", 1e9)];

/// Render a duration in the largest unit that shows it as at least 1.
///
/// Anything below a nanosecond (zero included) stays in nanoseconds.
pub fn format_elapsed(seconds: f64) -> String {
    let (unit, scale) = UNITS
        .iter()
        .copied()
        .find(|&(_, scale)| seconds * scale >= 1.0)
        .unwrap_or(UNITS[UNITS.len() - 1]);
    format!("{:.3} {}", seconds * scale, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed_units() {
        assert_eq!(format_elapsed(2.5), "2.500 s");
        assert_eq!(format_elapsed(1.0), "1.000 s");
        assert_eq!(format_elapsed(0.0421), "42.100 ms");
        assert_eq!(format_elapsed(0.001), "1.000 ms");
        assert_eq!(format_elapsed(3.5e-6), "3.500 µs");
        assert_eq!(format_elapsed(7.0e-8), "70.000 ns");
    }

    #[test]
    fn test_format_elapsed_falls_back_to_ns() {
        assert_eq!(format_elapsed(2.0e-10), "0.200 ns");
        assert_eq!(format_elapsed(0.0), "0.000 ns");
    }

    #[test]
    fn test_record_rates() {
        let record = Record {
            name: "blocked".into(),
            dims: Dims::square(1000),
            block: Some(64),
            threads: 4,
            seconds: 0.5,
            baseline_seconds: Some(2.0),
        };
        assert!((record.gflops() - 4.0).abs() < 1e-12);
        assert_eq!(record.speedup(), Some(4.0));
    }
}
