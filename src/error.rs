//! Error types for kernel setup, verification and result output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::verify::Mismatch;

/// Everything that can stop a benchmark run.
#[derive(Debug, Error)]
pub enum Error {
    /// Block size or thread count that can't drive a kernel.
    #[error("invalid kernel configuration: {0}")]
    InvalidConfig(String),

    /// The dedicated worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The timing table could not be opened.
    #[error("cannot open output artifact {}: {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a record failed after the artifact was opened.
    #[error("i/o error while writing results: {0}")]
    Io(#[from] io::Error),

    /// A kernel result disagreed with its check.
    #[error("verification failed in {benchmark} at {point}: {mismatch}")]
    Verification {
        benchmark: String,
        point: String,
        mismatch: Mismatch,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
