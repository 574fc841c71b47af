//! Logging utilities for formatted diagnostic output.
//!
//! All diagnostics go through the `log` facade; the binary installs `env_logger`, which writes
//! to standard error so that standard output carries only part filenames.

use std::path::Path;

use crate::batch::BYTES_PER_MB;
use crate::splitter::SplitSummary;

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use vcfsplit_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Logs the per-part progress line.
pub fn log_part_written(path: &Path, bytes: u64) {
    log::info!("wrote {} ({} MB before compression)", path.display(), bytes / BYTES_PER_MB);
}

/// The end-of-run summary line. Times are whole seconds.
#[must_use]
pub fn format_split_summary(summary: &SplitSummary) -> String {
    let skipped = if summary.records_skipped > 0 {
        format!(" ({} records range-skipped)", format_count(summary.records_skipped))
    } else {
        String::new()
    };
    format!(
        "wrote {} parts with {} records and {} uncompressed bytes{}; spent {}s reading and {}s writing, {}s stalled",
        format_count(summary.parts),
        format_count(summary.records),
        format_count(summary.bytes),
        skipped,
        summary.read.as_secs(),
        summary.write.as_secs(),
        summary.stall.as_secs(),
    )
}

/// Logs the end-of-run summary.
pub fn log_split_summary(summary: &SplitSummary) {
    log::info!("{}", format_split_summary(summary));
}
