//! VCF header capture.
//!
//! The header is the contiguous run of lines beginning with `#` at the start of the input. It
//! is captured once and replicated verbatim at the top of every part, so it is stored as an
//! immutable, reference-counted blob shared with all workers.

use std::sync::Arc;

use crate::errors::{Result, SplitError};
use crate::line_source::LineSource;
use std::io::BufRead;

/// The byte that marks a header line.
pub const HEADER_MARKER: u8 = b'#';

/// An immutable VCF header: every header line followed by a single `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header(Arc<[u8]>);

impl Header {
    /// The raw header bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Size of the header in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the header holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Header {
    fn from(bytes: Vec<u8>) -> Self {
        Header(Arc::from(bytes))
    }
}

/// Returns true if `line` is a header line.
#[inline]
#[must_use]
pub fn is_header_line(line: &[u8]) -> bool {
    line.first() == Some(&HEADER_MARKER)
}

/// Consume the leading `#` lines from `source` and return them as a [`Header`].
///
/// Stops at the first line that is not a header line, leaving it in `source` for the
/// partitioner.
///
/// # Errors
///
/// - [`SplitError::PrematureEof`] if the input ends before a non-header line is seen. This
///   includes inputs consisting solely of header lines.
/// - [`SplitError::MissingHeader`] if the first line is not a header line.
/// - [`SplitError::InputFailure`] on read errors.
pub fn capture_header<R: BufRead>(source: &mut LineSource<R>) -> Result<Header> {
    let mut buf = Vec::new();
    loop {
        let line = match source.peek() {
            Ok(line) => line,
            Err(SplitError::EndOfInput) => return Err(SplitError::PrematureEof),
            Err(e) => return Err(e),
        };
        if !is_header_line(line) {
            break;
        }
        buf.extend_from_slice(line);
        buf.push(b'\n');
        source.drop_line();
    }

    if buf.is_empty() {
        return Err(SplitError::MissingHeader);
    }
    Ok(Header::from(buf))
}
