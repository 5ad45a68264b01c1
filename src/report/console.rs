//! Human-readable output.

use std::io::{self, Write};

use super::{Record, Sink, format_elapsed};
use crate::error::Result;

/// Prints one aligned line per record, with a header whenever the
/// benchmark name changes.
pub struct ConsoleSink<W: Write = io::Stdout> {
    out: W,
    current: Option<String>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, current: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn record(&mut self, record: &Record) -> Result<()> {
        if self.current.as_deref() != Some(record.name.as_str()) {
            writeln!(self.out, "\n{}", record.name)?;
            writeln!(
                self.out,
                "{:>12} {:>6} {:>7} {:>12} {:>10} {:>8}",
                "Matrix", "Block", "Threads", "Time", "GFLOP/s", "Speedup"
            )?;
            writeln!(self.out, "{}", "-".repeat(60))?;
            self.current = Some(record.name.clone());
        }

        let block = record
            .block
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        let speedup = record
            .speedup()
            .map_or_else(|| "-".to_string(), |s| format!("{s:.2}×"));
        writeln!(
            self.out,
            "{:>12} {:>6} {:>7} {:>12} {:>10.2} {:>8}",
            record.dims.to_string(),
            block,
            record.threads,
            format_elapsed(record.seconds),
            record.gflops(),
            speedup
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Collects records and prints the best point per benchmark at the end.
pub struct SummarySink<W: Write = io::Stdout> {
    out: W,
    best: Vec<Record>,
}

impl SummarySink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SummarySink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            best: Vec::new(),
        }
    }

    /// Fastest record per benchmark name, in first-seen order.
    pub fn best(&self) -> &[Record] {
        &self.best
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for SummarySink<W> {
    fn record(&mut self, record: &Record) -> Result<()> {
        match self.best.iter_mut().find(|r| r.name == record.name) {
            Some(best) if record.gflops() > best.gflops() => *best = record.clone(),
            Some(_) => {}
            None => self.best.push(record.clone()),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.best.is_empty() {
            return Ok(());
        }

        writeln!(self.out, "\n{}", "=".repeat(60))?;
        writeln!(self.out, "SUMMARY (best point per benchmark)")?;
        writeln!(self.out, "{}", "=".repeat(60))?;
        for r in &self.best {
            let block = r.block.map_or_else(|| "-".to_string(), |b| b.to_string());
            writeln!(
                self.out,
                "{:<24} {:>10} block {:>5} x{:<3} {:>8.2} GFLOP/s",
                r.name,
                r.dims.to_string(),
                block,
                r.threads,
                r.gflops()
            )?;
        }
        writeln!(self.out, "{}", "=".repeat(60))?;
        self.out.flush()?;
        Ok(())
    }
}
