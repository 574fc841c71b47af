//! Writing one part file: header plus a batch of records, BGZF-compressed.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use vcfsplit_bgzf::BgzfWriter;

use crate::batch::RecordBatch;
use crate::errors::{Result, SplitError};
use crate::header::Header;

/// BGZF compression level used for parts. Parts are intermediate files, so speed wins.
pub const PART_COMPRESSION_LEVEL: u32 = 1;

/// File suffix appended after the zero-padded part index.
pub const PART_SUFFIX: &str = ".vcf.gz";

/// A part index paired with its output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRecord {
    /// Zero-based part index, assigned in read order.
    pub index: u64,
    /// Output path: `<prefix><index:06>.vcf.gz`.
    pub path: PathBuf,
}

impl PartRecord {
    /// Derive the part record for `index` under `prefix`.
    ///
    /// The prefix is used verbatim; it may name a directory (`out/`) or a file stem
    /// (`out/chunk.`).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use vcfsplit_lib::part_writer::PartRecord;
    ///
    /// let part = PartRecord::new(Path::new("/tmp/split/part"), 12);
    /// assert_eq!(part.path, Path::new("/tmp/split/part000012.vcf.gz"));
    /// ```
    #[must_use]
    pub fn new(prefix: &Path, index: u64) -> Self {
        let mut name = OsString::from(prefix.as_os_str());
        name.push(format!("{index:06}{PART_SUFFIX}"));
        Self { index, path: PathBuf::from(name) }
    }

    /// The line reported on standard output for this part, newline included.
    ///
    /// With `part_column` the zero-padded index is appended after a tab.
    #[must_use]
    pub fn stdout_line(&self, part_column: bool) -> Vec<u8> {
        let mut line = self.path.as_os_str().as_encoded_bytes().to_vec();
        if part_column {
            line.extend_from_slice(format!("\t{:06}", self.index).as_bytes());
        }
        line.push(b'\n');
        line
    }
}

/// Counts for one written part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartStats {
    /// Records written (header excluded).
    pub records: u64,
    /// Uncompressed bytes written, header included.
    pub bytes: u64,
}

/// Write `header` followed by every line of `batch` to a new BGZF file at `path`.
///
/// The file must not already exist. The header is flushed into its own block(s) before the
/// first record so parts can be concatenated cheaply downstream. Each line is dropped as soon
/// as it has been written.
///
/// # Errors
///
/// Returns [`SplitError::OutputFailure`] naming `path` if the file cannot be created, or if
/// writing, flushing or closing it fails.
pub fn write_part(path: &Path, header: &Header, batch: RecordBatch) -> Result<PartStats> {
    let mut writer = BgzfWriter::create_new(path, PART_COMPRESSION_LEVEL)
        .map_err(|e| SplitError::open_failure(path.to_path_buf(), e))?;
    writer
        .write_all(header.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| SplitError::open_failure(path.to_path_buf(), e))?;

    let mut stats = PartStats { records: 0, bytes: header.len() as u64 };
    for line in batch.into_lines() {
        writer.write_all(&line).and_then(|()| writer.write_all(b"\n")).map_err(|e| {
            SplitError::OutputFailure {
                path: path.to_path_buf(),
                reason: "error writing VCF data".to_string(),
                source: e,
            }
        })?;
        stats.records += 1;
        stats.bytes += line.len() as u64 + 1;
    }

    writer.finish().map_err(|e| SplitError::OutputFailure {
        path: path.to_path_buf(),
        reason: "error closing VCF output".to_string(),
        source: e,
    })?;
    Ok(stats)
}
