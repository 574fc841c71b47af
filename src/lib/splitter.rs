//! The producer side of the split: header capture, batching, and the top-level driver.
//!
//! [`run`] reads the header, then repeatedly fills a [`RecordBatch`] from the input until the
//! [`Cutoff`] trips, drops records outside the optional [`CoordinateRange`], and hands each
//! non-empty batch to the [`WriterPool`]. When the input is exhausted it waits for the pool to
//! drain and checks the accounting.
//!
//! # Example
//!
//! ```no_run
//! use vcfsplit_lib::splitter::{SplitOptions, run};
//!
//! # fn main() -> vcfsplit_lib::errors::Result<()> {
//! let options = SplitOptions::new("/scratch/chunks/part").with_lines(100_000).with_threads(4);
//! let stdin = std::io::stdin().lock();
//! let summary = run(stdin, &options, std::io::stdout())?;
//! eprintln!("{} parts", summary.parts);
//! # Ok(())
//! # }
//! ```

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::debug;

use crate::batch::{Cutoff, RecordBatch};
use crate::errors::{Result, SplitError};
use crate::header::{Header, capture_header};
use crate::line_source::LineSource;
use crate::logging::log_split_summary;
use crate::part_writer::PartRecord;
use crate::pool::{PoolConfig, PoolStats, WriterPool};
use crate::range::{CoordinateRange, in_range};
use crate::validation::{validate_megabytes, validate_positive};

/// Default maximum records per part in line mode.
pub const DEFAULT_LINES_PER_PART: u64 = 1_000_000;

/// Everything that controls one split run.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Output path prefix; parts are `<prefix><index:06>.vcf.gz`.
    pub prefix: PathBuf,
    /// Maximum records per part (line mode).
    pub lines: u64,
    /// Megabytes per part before compression; when positive, overrides `lines`.
    pub mb: u64,
    /// Maximum concurrent part writers.
    pub threads: usize,
    /// Append the part index as a second stdout column.
    pub part_column: bool,
    /// Suppress per-part and summary diagnostics.
    pub quiet: bool,
    /// Report parts on stdout in index order.
    pub ordered: bool,
    /// Only keep records inside this range.
    pub range: Option<CoordinateRange>,
}

impl SplitOptions {
    /// Options with defaults for everything but the prefix.
    pub fn new<P: Into<PathBuf>>(prefix: P) -> Self {
        Self {
            prefix: prefix.into(),
            lines: DEFAULT_LINES_PER_PART,
            mb: 0,
            threads: 1,
            part_column: false,
            quiet: false,
            ordered: false,
            range: None,
        }
    }

    /// Set the records-per-part limit.
    #[must_use]
    pub fn with_lines(mut self, lines: u64) -> Self {
        self.lines = lines;
        self
    }

    /// Set the megabytes-per-part limit (0 selects line mode).
    #[must_use]
    pub fn with_mb(mut self, mb: u64) -> Self {
        self.mb = mb;
        self
    }

    /// Set the number of concurrent writers.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Enable or disable the part-index stdout column.
    #[must_use]
    pub fn with_part_column(mut self, part_column: bool) -> Self {
        self.part_column = part_column;
        self
    }

    /// Enable or disable diagnostics.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Enable or disable index-ordered stdout.
    #[must_use]
    pub fn with_ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    /// Restrict output to records inside `range`.
    #[must_use]
    pub fn with_range(mut self, range: Option<CoordinateRange>) -> Self {
        self.range = range;
        self
    }

    /// The cutoff implied by `lines` and `mb`.
    #[must_use]
    pub fn cutoff(&self) -> Cutoff {
        Cutoff::from_limits(self.lines, self.mb)
    }

    /// Check the numeric options.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidParameter`] for a zero line limit or thread count, or a
    /// megabyte limit that overflows.
    pub fn validate(&self) -> Result<()> {
        validate_positive(self.lines, "lines")?;
        validate_positive(self.threads, "threads")?;
        validate_megabytes(self.mb, "mb")
    }

    fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_threads: self.threads,
            part_column: self.part_column,
            quiet: self.quiet,
            ordered: self.ordered,
        }
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitSummary {
    /// Parts written.
    pub parts: u64,
    /// Records written across all parts.
    pub records: u64,
    /// Uncompressed bytes written, one header per part included.
    pub bytes: u64,
    /// Records dropped by the range filter.
    pub records_skipped: u64,
    /// Non-header input lines consumed.
    pub body_lines: u64,
    /// Time spent filling batches.
    pub read: Duration,
    /// Time spent writing parts, summed over workers.
    pub write: Duration,
    /// Time the reader waited for a free writer.
    pub stall: Duration,
}

impl SplitSummary {
    fn from_stats(stats: &PoolStats, body_lines: u64) -> Self {
        Self {
            parts: stats.completed,
            records: stats.records_written,
            bytes: stats.bytes_processed,
            records_skipped: stats.records_skipped,
            body_lines,
            read: stats.read,
            write: stats.write,
            stall: stats.stall,
        }
    }
}

/// Reads batches from a line source and dispatches them to a pool.
pub struct Splitter<'a, R> {
    source: LineSource<R>,
    header: Header,
    prefix: &'a Path,
    cutoff: Cutoff,
    range: Option<&'a CoordinateRange>,
    pool: &'a WriterPool,
    /// Index the next dispatched part will get.
    next_part: u64,
    /// Number of source lines that were header lines.
    header_lines: u64,
}

impl<'a, R: BufRead> Splitter<'a, R> {
    /// Capture the header from `source` and prepare to split the rest.
    ///
    /// # Errors
    ///
    /// Propagates header capture failures ([`SplitError::PrematureEof`],
    /// [`SplitError::MissingHeader`], [`SplitError::InputFailure`]).
    pub fn new(
        mut source: LineSource<R>,
        options: &'a SplitOptions,
        pool: &'a WriterPool,
    ) -> Result<Self> {
        let header = capture_header(&mut source)?;
        // The first body line has been peeked and counted already.
        let header_lines = source.lines_read() - 1;
        debug!("Captured {} header bytes from {header_lines} lines", header.len());
        Ok(Self {
            source,
            header,
            prefix: &options.prefix,
            cutoff: options.cutoff(),
            range: options.range.as_ref(),
            pool,
            next_part: 0,
            header_lines,
        })
    }

    /// The captured header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of parts dispatched so far.
    #[must_use]
    pub fn parts_dispatched(&self) -> u64 {
        self.next_part
    }

    /// Number of non-header lines consumed so far.
    #[must_use]
    pub fn body_lines(&self) -> u64 {
        self.source.lines_read() - self.header_lines
    }

    /// Fill one batch and dispatch it. Returns `Ok(true)` while more input may remain.
    ///
    /// An empty batch at end of input is not dispatched and does not use up a part index.
    /// Also returns `Ok(false)` when the pool refuses the batch because a worker failed.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InputFailure`] on read errors, or a dispatch error.
    pub fn fill_part(&mut self) -> Result<bool> {
        let start = Instant::now();
        let mut batch = RecordBatch::new();
        let mut skipped = 0u64;
        let mut more = true;

        while !self.cutoff.is_reached(&batch) {
            let line = match self.source.take() {
                Ok(line) => line,
                Err(SplitError::EndOfInput) => {
                    more = false;
                    break;
                }
                Err(e) => {
                    self.pool.add_skipped(skipped);
                    return Err(e);
                }
            };
            if in_range(self.range, &line) {
                batch.push(line);
            } else {
                skipped += 1;
            }
        }
        self.pool.add_skipped(skipped);

        if batch.is_empty() {
            return Ok(more);
        }

        let part = PartRecord::new(self.prefix, self.next_part);
        debug!("Dispatching part {} with {} records", part.index, batch.records());
        if !self.pool.dispatch(part, &self.header, batch, start.elapsed())? {
            return Ok(false);
        }
        self.next_part += 1;
        Ok(more)
    }
}

/// Split `input` into parts according to `options`, reporting part paths to `sink`.
///
/// # Errors
///
/// Returns the first error encountered: a usage/parameter error, a header or input error, or
/// a worker failure. Workers already running are allowed to finish before returning.
pub fn run<R, W>(input: R, options: &SplitOptions, sink: W) -> Result<SplitSummary>
where
    R: BufRead,
    W: Write + Send + 'static,
{
    options.validate()?;
    let pool = WriterPool::new(options.pool_config(), sink);
    let mut splitter = Splitter::new(LineSource::new(input), options, &pool)?;

    loop {
        match splitter.fill_part() {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                // Drain in-flight workers, but report the producer's error.
                if let Err(worker_error) = pool.wait_idle() {
                    debug!("Worker error while shutting down: {worker_error}");
                }
                return Err(e);
            }
        }
    }

    let stats = pool.wait_idle()?;
    let summary = SplitSummary::from_stats(&stats, splitter.body_lines());
    if summary.records + summary.records_skipped != summary.body_lines {
        return Err(SplitError::InternalInconsistency(format!(
            "{} records kept and {} skipped, but {} lines were read",
            summary.records, summary.records_skipped, summary.body_lines
        )));
    }
    if !options.quiet {
        log_split_summary(&summary);
    }
    Ok(summary)
}
