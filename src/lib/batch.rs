//! Record batches and the cutoff that ends them.

/// Number of bytes in one megabyte (MiB) for `--mb`.
pub const BYTES_PER_MB: u64 = 1_048_576;

/// The condition that ends accumulation of a batch.
///
/// The cutoff is checked before each line is read, so a batch stops as soon as it is at or
/// over the limit and always holds at least one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cutoff {
    /// Stop once the batch holds this many records.
    Lines(u64),
    /// Stop once the batch holds at least this many uncompressed bytes.
    Bytes(u64),
}

impl Cutoff {
    /// Choose the cutoff from the command-line values: a positive `mb` selects byte mode and
    /// overrides `lines`.
    #[must_use]
    pub fn from_limits(lines: u64, mb: u64) -> Self {
        if mb > 0 { Cutoff::Bytes(mb.saturating_mul(BYTES_PER_MB)) } else { Cutoff::Lines(lines) }
    }

    /// Returns true if `batch` is complete.
    #[inline]
    #[must_use]
    pub fn is_reached(&self, batch: &RecordBatch) -> bool {
        match *self {
            Cutoff::Lines(limit) => batch.records() >= limit,
            Cutoff::Bytes(limit) => batch.bytes() >= limit,
        }
    }
}

/// An ordered run of record lines destined for one part.
///
/// Tracks the record count and the uncompressed size (each line plus its newline).
#[derive(Debug, Default)]
pub struct RecordBatch {
    lines: Vec<Vec<u8>>,
    bytes: u64,
}

impl RecordBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line (without its newline).
    pub fn push(&mut self, line: Vec<u8>) {
        self.bytes += line.len() as u64 + 1;
        self.lines.push(line);
    }

    /// Number of records in the batch.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.lines.len() as u64
    }

    /// Uncompressed size of the records, counting one newline per line.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// True if the batch holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the batch, yielding its lines in order.
    #[must_use]
    pub fn into_lines(self) -> Vec<Vec<u8>> {
        self.lines
    }
}
