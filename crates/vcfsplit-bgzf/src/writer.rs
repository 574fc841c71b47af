//! BGZF compression for part files.
//!
//! [`BgzfWriter`] buffers uncompressed bytes until a full BGZF block is available, compresses
//! it with libdeflate (via the `bgzf` crate), and writes the block straight to the inner
//! writer. An explicit [`Write::flush`] ends the current block early, which lets callers place
//! a header in its own block. [`BgzfWriter::finish`] writes the final partial block and the
//! standard 28-byte EOF marker.

use bgzf::{CompressionLevel, Compressor as BgzfCompressor};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

// ============================================================================
// Constants
// ============================================================================

/// Maximum uncompressed size for a BGZF block (64KB - header/footer overhead).
pub const BGZF_MAX_BLOCK_SIZE: usize = bgzf::BGZF_BLOCK_SIZE;

/// BGZF end-of-file marker block (an empty block).
pub const BGZF_EOF: [u8; 28] = [
    0x1f, 0x8b, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x06, 0x00, 0x42, 0x43, 0x02, 0x00,
    0x1b, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

// ============================================================================
// Writer
// ============================================================================

/// A BGZF writer that compresses blocks inline on the calling thread.
///
/// Each part in vcfsplit is written by a single worker thread, so compression happens inline
/// rather than on a separate compression pool.
///
/// # Usage
///
/// ```no_run
/// use std::io::Write;
/// use vcfsplit_bgzf::BgzfWriter;
///
/// # fn main() -> std::io::Result<()> {
/// let mut writer = BgzfWriter::create_new("part000000.vcf.gz", 1)?;
/// writer.write_all(b"##fileformat=VCFv4.3\n")?;
/// writer.flush()?; // header gets its own block
/// writer.write_all(b"chr1\t10\n")?;
/// writer.finish()?;
/// # Ok(())
/// # }
/// ```
pub struct BgzfWriter<W: Write> {
    /// Destination for compressed blocks.
    inner: W,
    /// Buffer accumulating uncompressed data (up to one block).
    buffer: Vec<u8>,
    /// Reusable output buffer for one compressed block.
    compressed: Vec<u8>,
    /// bgzf crate compressor (reused for efficiency).
    compressor: BgzfCompressor,
    /// Total uncompressed bytes accepted so far.
    uncompressed_bytes: u64,
}

impl BgzfWriter<File> {
    /// Create a new file at `path` and wrap it in a BGZF writer.
    ///
    /// The file is opened in exclusive-create mode: if anything already exists at `path` the
    /// call fails with [`io::ErrorKind::AlreadyExists`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the compression level is invalid.
    pub fn create_new<P: AsRef<Path>>(path: P, compression_level: u32) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        Self::new(file, compression_level)
    }
}

impl<W: Write> BgzfWriter<W> {
    /// Create a new writer with the specified compression level.
    ///
    /// # Arguments
    ///
    /// * `inner` - Destination for compressed blocks.
    /// * `compression_level` - Compression level (1-12, higher = smaller but slower).
    ///   Values outside the range are clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the bgzf library rejects the compression level.
    pub fn new(inner: W, compression_level: u32) -> io::Result<Self> {
        let level = u8::try_from(compression_level.clamp(1, 12))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let level = CompressionLevel::new(level).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid BGZF level: {level}"))
        })?;
        Ok(Self {
            inner,
            buffer: Vec::with_capacity(BGZF_MAX_BLOCK_SIZE),
            compressed: Vec::new(),
            compressor: BgzfCompressor::new(level),
            uncompressed_bytes: 0,
        })
    }

    /// Total number of uncompressed bytes written so far.
    #[must_use]
    pub fn uncompressed_bytes(&self) -> u64 {
        self.uncompressed_bytes
    }

    /// Compress any buffered data, write the EOF marker, and flush the inner writer.
    ///
    /// Returns the inner writer so file handles are closed when it is dropped by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if compression or writing fails.
    pub fn finish(mut self) -> io::Result<W> {
        self.compress_current_buffer()?;
        self.inner.write_all(&BGZF_EOF)?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Compress the current buffer and write the block to the inner writer.
    fn compress_current_buffer(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.compressed.clear();
        self.compressor
            .compress(&self.buffer, &mut self.compressed)
            .map_err(|e| io::Error::other(format!("BGZF compression failed: {e}")))?;
        self.inner.write_all(&self.compressed)?;

        self.buffer.clear();
        Ok(())
    }
}

impl<W: Write> Write for BgzfWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let remaining_in_buffer = BGZF_MAX_BLOCK_SIZE - self.buffer.len();
        let to_copy = remaining_in_buffer.min(data.len());

        self.buffer.extend_from_slice(&data[..to_copy]);
        self.uncompressed_bytes += to_copy as u64;

        if self.buffer.len() >= BGZF_MAX_BLOCK_SIZE {
            self.compress_current_buffer()?;
        }

        Ok(to_copy)
    }

    /// Ends the current block (even if it is smaller than 64KB) and flushes the inner writer.
    fn flush(&mut self) -> io::Result<()> {
        self.compress_current_buffer()?;
        self.inner.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================
