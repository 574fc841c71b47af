//! Custom error types for vcfsplit operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for vcfsplit operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Error type for vcfsplit operations
#[derive(Error, Debug)]
pub enum SplitError {
    /// Command-line usage problem (e.g. a terminal on standard input)
    #[error("{0}")]
    Usage(String),

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// The `--range` option could not be parsed
    #[error("Unable to parse --range '{range}' as chr:beg-end: {reason}")]
    InvalidRange {
        /// The raw range string
        range: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Clean end of the input stream. Used as a signal by the line source.
    #[error("End of input")]
    EndOfInput,

    /// I/O failure reading standard input
    #[error("Input failure: {0}")]
    InputFailure(#[source] io::Error),

    /// Input ended while the header was still being read
    #[error("Premature EOF while reading VCF header")]
    PrematureEof,

    /// The input did not start with any header lines
    #[error("Input does not begin with a VCF header ('#' lines)")]
    MissingHeader,

    /// Failure opening, writing, flushing or closing a part file
    #[error("Error writing part file {}: {reason}", path.display())]
    OutputFailure {
        /// Path of the part file
        path: PathBuf,
        /// What went wrong
        reason: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failure writing a part filename to standard output
    #[error("Error writing filename to standard output: {0}")]
    StdoutFailure(#[source] io::Error),

    /// A worker thread could not be started
    #[error("Couldn't launch worker thread: {0}")]
    ThreadSpawn(#[source] io::Error),

    /// A worker thread panicked while writing a part
    #[error("Worker writing part {part} panicked")]
    WorkerPanicked {
        /// Index of the part being written
        part: u64,
    },

    /// Accounting invariants did not hold after all workers finished
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl SplitError {
    /// Build an [`SplitError::OutputFailure`] for a failure to create or start a part file.
    pub(crate) fn open_failure(path: PathBuf, source: io::Error) -> Self {
        SplitError::OutputFailure {
            path,
            reason: "could not open for writing; delete it if it already exists".to_string(),
            source,
        }
    }

    /// True if this error is the line source's end-of-input signal.
    #[must_use]
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, SplitError::EndOfInput)
    }
}
