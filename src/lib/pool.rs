//! Bounded pool of part-writing worker threads.
//!
//! The producer hands each finished batch to [`WriterPool::dispatch`], which blocks while all
//! worker slots are busy and then spawns a thread that owns the batch. All shared mutable
//! state (counters, timings, the stdout sink, the first failure) lives in one [`PoolState`]
//! behind a single mutex, and a condition variable is notified whenever a worker finishes.
//!
//! Standard output lines are written while holding that mutex, with one `write_all` and a flush
//! per part, so lines from different workers never interleave. The matching `wrote ...` log
//! line is emitted under the same lock, keeping each stdout/stderr pair together.
//!
//! # Failure handling
//!
//! A failing (or panicking) worker still releases its slot and records the first failure.
//! Once a failure is recorded, `dispatch` refuses new batches and [`WriterPool::wait_idle`]
//! returns the failure after every running worker has finished.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use parking_lot::{Condvar, Mutex};

use crate::batch::RecordBatch;
use crate::errors::{Result, SplitError};
use crate::header::Header;
use crate::logging::log_part_written;
use crate::part_writer::{PartRecord, write_part};
use crate::reorder_buffer::ReorderBuffer;

/// Behaviour switches for a [`WriterPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of workers running at once (at least 1).
    pub max_threads: usize,
    /// Append a tab and the zero-padded part index to each stdout line.
    pub part_column: bool,
    /// Suppress the per-part `wrote ...` log line.
    pub quiet: bool,
    /// Release stdout lines in part-index order instead of completion order.
    pub ordered: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { max_threads: 1, part_column: false, quiet: false, ordered: false }
    }
}

/// A snapshot of the pool's counters and timings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Workers launched.
    pub launched: u64,
    /// Workers that wrote their part and reported it on stdout.
    pub completed: u64,
    /// Workers currently running.
    pub active: usize,
    /// Records handed to workers.
    pub records_read: u64,
    /// Records written by completed workers.
    pub records_written: u64,
    /// Uncompressed bytes written by completed workers, headers included.
    pub bytes_processed: u64,
    /// Records dropped by the coordinate range filter.
    pub records_skipped: u64,
    /// Time the producer spent filling batches.
    pub read: Duration,
    /// Time the producer spent waiting for a free worker slot.
    pub stall: Duration,
    /// Total time workers spent writing parts.
    pub write: Duration,
}

/// A part that has been written but whose stdout line may still be waiting for its turn.
struct FinishedPart {
    path: PathBuf,
    bytes: u64,
    line: Vec<u8>,
}

/// Shared mutable state, guarded by the pool mutex.
struct PoolState {
    stats: PoolStats,
    sink: Box<dyn Write + Send>,
    /// Present only in ordered mode.
    reorder: Option<ReorderBuffer<FinishedPart>>,
    failure: Option<SplitError>,
}

impl PoolState {
    fn record_failure(&mut self, error: SplitError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        } else {
            debug!("Additional worker failure after the first: {error}");
        }
    }

    /// Write a finished part's stdout line and log it.
    fn emit(&mut self, part: &FinishedPart, quiet: bool) -> Result<()> {
        self.sink
            .write_all(&part.line)
            .and_then(|()| self.sink.flush())
            .map_err(SplitError::StdoutFailure)?;
        if !quiet {
            log_part_written(&part.path, part.bytes);
        }
        Ok(())
    }

    /// Emit `part` immediately, or queue it until all lower indices are out in ordered mode.
    fn release(&mut self, index: u64, part: FinishedPart, quiet: bool) -> Result<()> {
        let Some(mut reorder) = self.reorder.take() else {
            return self.emit(&part, quiet);
        };
        reorder.insert(index, part);
        let mut result = Ok(());
        for ready in reorder.drain_ready() {
            result = self.emit(&ready, quiet);
            if result.is_err() {
                break;
            }
        }
        self.reorder = Some(reorder);
        result
    }
}

struct Shared {
    config: PoolConfig,
    state: Mutex<PoolState>,
    worker_finished: Condvar,
}

/// A fixed-capacity pool of part writers.
///
/// Each pool owns its own state, so several pools can run in one process.
pub struct WriterPool {
    shared: Arc<Shared>,
}

impl WriterPool {
    /// Create a pool that reports finished parts to `sink` (standard output in the binary).
    pub fn new<W: Write + Send + 'static>(config: PoolConfig, sink: W) -> Self {
        let config = PoolConfig { max_threads: config.max_threads.max(1), ..config };
        let state = PoolState {
            stats: PoolStats::default(),
            sink: Box::new(sink),
            reorder: config.ordered.then(ReorderBuffer::new),
            failure: None,
        };
        Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(state),
                worker_finished: Condvar::new(),
            }),
        }
    }

    /// The pool's configuration.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.shared.config
    }

    /// A snapshot of the current counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.shared.state.lock().stats
    }

    /// Add to the count of records dropped by the range filter.
    pub fn add_skipped(&self, records: u64) {
        if records > 0 {
            self.shared.state.lock().stats.records_skipped += records;
        }
    }

    /// Hand `batch` to a new worker that writes it as `part`.
    ///
    /// Blocks while `max_threads` workers are already running. `read_time` is the time spent
    /// filling the batch and is added to the read total.
    ///
    /// Returns `Ok(false)` without launching anything if a worker has already failed; the
    /// failure itself is reported by [`wait_idle`](Self::wait_idle).
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::ThreadSpawn`] if the worker thread cannot be started.
    pub fn dispatch(
        &self,
        part: PartRecord,
        header: &Header,
        batch: RecordBatch,
        read_time: Duration,
    ) -> Result<bool> {
        debug_assert!(!batch.is_empty(), "empty batches are never dispatched");
        let mut state = self.shared.state.lock();
        state.stats.read += read_time;

        let stall_start = Instant::now();
        while state.stats.active >= self.shared.config.max_threads && state.failure.is_none() {
            self.shared.worker_finished.wait(&mut state);
        }
        state.stats.stall += stall_start.elapsed();

        if state.failure.is_some() {
            return Ok(false);
        }

        let records = batch.records();
        let shared = Arc::clone(&self.shared);
        let header = header.clone();
        let name = format!("vcfsplit-part-{:06}", part.index);
        thread::Builder::new()
            .name(name)
            .spawn(move || run_worker(&shared, part, &header, batch))
            .map_err(SplitError::ThreadSpawn)?;

        // The worker cannot finish before we release the lock, so counting after spawning is safe.
        state.stats.records_read += records;
        state.stats.launched += 1;
        state.stats.active += 1;
        Ok(true)
    }

    /// Wait until no workers are running, then return the final counters.
    ///
    /// # Errors
    ///
    /// Returns the first worker failure, if any, or [`SplitError::InternalInconsistency`] if
    /// `launched != completed` or `records_read != records_written`.
    pub fn wait_idle(&self) -> Result<PoolStats> {
        let mut state = self.shared.state.lock();
        while state.stats.active > 0 {
            self.shared.worker_finished.wait(&mut state);
        }

        if let Some(failure) = state.failure.take() {
            return Err(failure);
        }

        let stats = state.stats;
        if stats.launched != stats.completed {
            return Err(SplitError::InternalInconsistency(format!(
                "launched {} workers but {} completed",
                stats.launched, stats.completed
            )));
        }
        if stats.records_read != stats.records_written {
            return Err(SplitError::InternalInconsistency(format!(
                "read {} records but wrote {}",
                stats.records_read, stats.records_written
            )));
        }
        if let Some(reorder) = &state.reorder {
            if !reorder.is_empty() {
                return Err(SplitError::InternalInconsistency(format!(
                    "{} finished parts were never reported",
                    reorder.len()
                )));
            }
        }
        Ok(stats)
    }
}

/// Releases a worker slot when dropped, so a panicking worker cannot wedge the pool.
struct SlotGuard<'a> {
    shared: &'a Shared,
    part: u64,
    released: bool,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let mut state = self.shared.state.lock();
        state.record_failure(SplitError::WorkerPanicked { part: self.part });
        state.stats.active -= 1;
        self.shared.worker_finished.notify_all();
    }
}

fn run_worker(shared: &Shared, part: PartRecord, header: &Header, batch: RecordBatch) {
    let mut guard = SlotGuard { shared, part: part.index, released: false };
    let start = Instant::now();
    let result = write_part(&part.path, header, batch);
    let elapsed = start.elapsed();

    let line = part.stdout_line(shared.config.part_column);
    let mut state = shared.state.lock();
    match result {
        Ok(part_stats) => {
            let finished = FinishedPart { path: part.path, bytes: part_stats.bytes, line };
            match state.release(part.index, finished, shared.config.quiet) {
                Ok(()) => {
                    state.stats.completed += 1;
                    state.stats.write += elapsed;
                    state.stats.records_written += part_stats.records;
                    state.stats.bytes_processed += part_stats.bytes;
                }
                Err(e) => state.record_failure(e),
            }
        }
        Err(e) => state.record_failure(e),
    }
    state.stats.active -= 1;
    guard.released = true;
    shared.worker_finished.notify_all();
}
