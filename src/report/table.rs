//! Two-column timing tables (dimension, seconds) on disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::{Record, Sink};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    /// `size,time` header, comma separated.
    Csv,
    /// `Dimension Time(s)` header, space separated.
    Whitespace,
}

/// Appends one `dimension seconds` row per record to a file.
///
/// Files ending in `.csv` get comma-separated rows, anything else gets a
/// whitespace-separated table.
pub struct TableSink {
    path: PathBuf,
    style: Style,
    out: BufWriter<File>,
    rows: usize,
}

impl TableSink {
    /// Create (truncate) the artifact and write its header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let artifact_err = |source| Error::Artifact {
            path: path.clone(),
            source,
        };

        let file = File::create(&path).map_err(artifact_err)?;
        let style = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Style::Csv,
            _ => Style::Whitespace,
        };

        let mut out = BufWriter::new(file);
        let header = match style {
            Style::Csv => "size,time",
            Style::Whitespace => "Dimension Time(s)",
        };
        writeln!(out, "{header}").map_err(artifact_err)?;

        Ok(Self {
            path,
            style,
            out,
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for TableSink {
    fn record(&mut self, record: &Record) -> Result<()> {
        // Square sweeps only vary one size, so the table is keyed on m.
        let dim = record.dims.m;
        match self.style {
            Style::Csv => writeln!(self.out, "{},{:.6}", dim, record.seconds)?,
            Style::Whitespace => writeln!(self.out, "{} {:.6}", dim, record.seconds)?,
        }
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        info!(path = %self.path.display(), rows = self.rows, "timing table written");
        Ok(())
    }
}
